// ============================================================
// Layer 4 — EEG Batcher
// ============================================================
// Stacks samples into the tensors the classifier consumes:
//
//   Input:  N samples, each channel_dim × time_dim (channel-major)
//   Output: inputs  [N, channel_dim, time_dim]  float
//           targets [N * positions]              int
//
// `positions` is how many logit rows the model emits per sample
// (1 for the default geometry); each label is repeated that
// many times so targets line up with the logits.
//
// Samples are already contiguous channel-major slices, so
// batching is a flat copy followed by a reshape.

use burn::prelude::*;

use crate::domain::sample::SampleRef;

/// A mini-batch ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct EegBatch<B: Backend> {
    /// shape: [batch_size, channel_dim, time_dim]
    pub inputs: Tensor<B, 3>,

    /// shape: [batch_size * positions]
    pub targets: Tensor<B, 1, Int>,
}

/// Holds the target device so tensors land on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct EegBatcher<B: Backend> {
    pub device:    B::Device,
    pub positions: usize,
}

impl<B: Backend> EegBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device, positions: 1 }
    }

    pub fn with_positions(mut self, positions: usize) -> Self {
        self.positions = positions.max(1);
        self
    }

    /// Stack `items` into one batch. `items` must be non-empty and
    /// share a shape; the store guarantees the latter.
    pub fn batch(&self, items: &[SampleRef<'_>]) -> EegBatch<B> {
        let batch_size  = items.len();
        let channel_dim = items[0].channel_dim;
        let time_dim    = items[0].time_dim;

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .collect();

        let targets: Vec<i32> = items
            .iter()
            .flat_map(|s| std::iter::repeat(s.label).take(self.positions))
            .collect();

        let inputs = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([batch_size, channel_dim, time_dim]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        EegBatch { inputs, targets }
    }
}
