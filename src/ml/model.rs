use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool1d, MaxPool1dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig1d,
    },
    prelude::*,
    tensor::{activation::relu, backend::AutodiffBackend},
};

/// Fully convolutional seizure classifier.
///
/// Three (conv k=3 → batch norm → ReLU → max-pool) stages, then a
/// two-convolution head producing 2 logits per output position.
/// With the default 1024-step input and pool ratio 4 the feature
/// map is 16 long and the k=16 head collapses it to one position,
/// so each sample yields exactly one logit pair.
#[derive(Config, Debug)]
pub struct SeizureNetConfig {
    /// EEG channels per sample
    pub in_channels: usize,
    #[config(default = 128)]
    pub n_filters:   usize,
    #[config(default = 100)]
    pub head_hidden: usize,
    #[config(default = 16)]
    pub head_kernel: usize,
    #[config(default = 4)]
    pub pool:        usize,
}

impl SeizureNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SeizureNet<B> {
        SeizureNet {
            block1: self.block(self.in_channels, device),
            block2: self.block(self.n_filters, device),
            block3: self.block(self.n_filters, device),
            head1: Conv1dConfig::new(self.n_filters, self.head_hidden, self.head_kernel)
                .with_padding(PaddingConfig1d::Valid)
                .init(device),
            head2: Conv1dConfig::new(self.head_hidden, 2, 1)
                .with_padding(PaddingConfig1d::Valid)
                .init(device),
        }
    }

    fn block<B: Backend>(&self, channels_in: usize, device: &B::Device) -> ConvBlock<B> {
        ConvBlock {
            conv: Conv1dConfig::new(channels_in, self.n_filters, 3)
                .with_padding(PaddingConfig1d::Explicit(1))
                .init(device),
            norm: BatchNormConfig::new(self.n_filters).init(device),
            pool: MaxPool1dConfig::new(self.pool).with_stride(self.pool).init(),
        }
    }

    /// Number of logit rows one input of length `time_dim` produces,
    /// or 0 if the input is too short for the head.
    pub fn positions_per_sample(&self, time_dim: usize) -> usize {
        let mut len = time_dim;
        for _ in 0..3 {
            len /= self.pool;
        }
        (len + 1).saturating_sub(self.head_kernel)
    }
}

/// conv → batch norm → ReLU → downsample
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    pub conv: Conv1d<B>,
    pub norm: BatchNorm<B, 1>,
    pub pool: MaxPool1d,
}

impl<B: Backend> ConvBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = self.conv.forward(x);
        let x = relu(self.norm.forward(x));
        self.pool.forward(x)
    }
}

#[derive(Module, Debug)]
pub struct SeizureNet<B: Backend> {
    pub block1: ConvBlock<B>,
    pub block2: ConvBlock<B>,
    pub block3: ConvBlock<B>,
    pub head1:  Conv1d<B>,
    pub head2:  Conv1d<B>,
}

impl<B: Backend> SeizureNet<B> {
    /// Feature map before the head: [batch, n_filters, time / pool³]
    pub fn features(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = self.block1.forward(x);
        let x = self.block2.forward(x);
        self.block3.forward(x)
    }

    /// inputs: [batch, channels, time] → logits: [batch * positions, 2]
    ///
    /// Rows are ordered sample-major, so with one position per
    /// sample row i is the logit pair of sample i.
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = self.features(inputs);
        let x = self.head2.forward(self.head1.forward(x)); // [batch, 2, positions]
        let [batch, classes, positions] = x.dims();
        x.swap_dims(1, 2).reshape([batch * positions, classes])
    }

    /// Cross-entropy over one batch. Targets must have one entry
    /// per logit row.
    pub fn forward_loss(
        &self,
        inputs:  Tensor<B, 3>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(inputs);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use burn::backend::NdArray;

    /// Small network for a 64-step input: 64 → 16 → 4 → 1, head k=1.
    pub(crate) fn tiny_config(in_channels: usize) -> SeizureNetConfig {
        SeizureNetConfig::new(in_channels)
            .with_n_filters(4)
            .with_head_hidden(4)
            .with_head_kernel(1)
    }

    #[test]
    fn test_default_geometry_gives_one_position() {
        let cfg = SeizureNetConfig::new(18);
        assert_eq!(cfg.positions_per_sample(1024), 1);
        assert_eq!(cfg.positions_per_sample(2048), 17);
        assert_eq!(cfg.positions_per_sample(512), 0);
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: SeizureNet<NdArray> = tiny_config(3).init(&device);
        let x = Tensor::<NdArray, 3>::zeros([5, 3, 64], &device);
        assert_eq!(model.forward(x).dims(), [5, 2]);
    }

    #[test]
    fn test_multiple_positions_are_sample_major() {
        let device = Default::default();
        let model: SeizureNet<NdArray> = tiny_config(2).init(&device);
        // 128 steps → 2 positions per sample
        let x = Tensor::<NdArray, 3>::ones([3, 2, 128], &device);
        assert_eq!(tiny_config(2).positions_per_sample(128), 2);
        assert_eq!(model.forward(x).dims(), [6, 2]);
    }
}
