// ============================================================
// Layer 5 — Evaluator / Inferencer
// ============================================================
// Runs a model over a store in archive order (no shuffling),
// collects logits, and derives predicted labels by argmax
// (ties go to class 0). Used for validation during training and
// for scoring a held-out archive from a saved checkpoint.

use anyhow::{ensure, Result};
use burn::prelude::*;
use std::{fs::OpenOptions, io::Write, path::Path};

use crate::data::{batcher::EegBatcher, store::SampleStore};
use crate::domain::{metrics::ClassificationMetrics, sample::SampleRef, traits::SampleSource};
use crate::infra::checkpoint::{CheckpointManager, BEST_MODEL};
use crate::ml::model::{SeizureNet, SeizureNetConfig};

pub type InferBackend = burn::backend::Wgpu;

/// Model outputs over a whole store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    /// One entry per logit row (labels repeated per position)
    pub truths:     Vec<i32>,
    pub predicted:  Vec<i32>,
    pub logits:     Vec<[f32; 2]>,
    /// Logit rows produced by each batch, in order
    pub batch_rows: Vec<usize>,
}

impl Predictions {
    pub fn metrics(&self) -> ClassificationMetrics {
        ClassificationMetrics::compute(&self.truths, &self.predicted)
    }
}

/// Forward every sample of `store`, `batch_size` at a time.
pub fn predict<B: Backend>(
    model:      &SeizureNet<B>,
    store:      &SampleStore,
    batch_size: usize,
    positions:  usize,
    device:     &B::Device,
) -> Result<Predictions> {
    ensure!(batch_size > 0, "batch size must be positive");
    let batcher = EegBatcher::<B>::new(device.clone()).with_positions(positions);
    let mut out = Predictions::default();

    let samples: Vec<SampleRef<'_>> = store.iter().collect();
    for items in samples.chunks(batch_size) {
        let batch = batcher.batch(items);
        let logits = model.forward(batch.inputs);
        let [rows, classes] = logits.dims();
        ensure!(classes == 2, "expected 2 logits per row, got {classes}");

        let flat: Vec<f32> = logits.into_data().iter::<f32>().collect();
        for pair in flat.chunks_exact(2) {
            out.predicted.push(i32::from(pair[1] > pair[0]));
            out.logits.push([pair[0], pair[1]]);
        }
        out.truths.extend(batch.targets.into_data().iter::<i64>().map(|l| l as i32));
        out.batch_rows.push(rows);
    }
    Ok(out)
}

/// Validation F1 and friends for `store`.
pub fn evaluate<B: Backend>(
    model:      &SeizureNet<B>,
    store:      &SampleStore,
    batch_size: usize,
    positions:  usize,
    device:     &B::Device,
) -> Result<ClassificationMetrics> {
    Ok(predict(model, store, batch_size, positions, device)?.metrics())
}

/// Render one batch of logits:
///
/// ```text
/// [
///  [   0.123456  -0.654321]
///  [   1.000000   0.000000]
/// ]
/// ```
pub fn format_logits_block(rows: &[[f32; 2]]) -> String {
    let mut out = String::from("[\n");
    let body = rows
        .iter()
        .map(|r| format!(" [ {:10.6} {:10.6}]", r[0], r[1]))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&body);
    out.push_str("\n]");
    out
}

/// Append every batch's logits block to `path`.
pub fn append_logits_log(path: impl AsRef<Path>, predictions: &Predictions) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut text = String::new();
    let mut offset = 0;
    for &rows in &predictions.batch_rows {
        text.push_str(&format_logits_block(&predictions.logits[offset..offset + rows]));
        text.push('\n');
        offset += rows;
    }

    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    f.write_all(text.as_bytes())?;
    tracing::debug!("Appended {} logit rows to '{}'", offset, path.display());
    Ok(())
}

/// A trained model restored from a checkpoint directory.
/// Defaults to the GPU backend the CLI runs on.
pub struct Inferencer<B: Backend = InferBackend> {
    model:      SeizureNet<B>,
    model_cfg:  SeizureNetConfig,
    batch_size: usize,
    device:     B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(ckpt: &CheckpointManager, device: B::Device) -> Result<Self> {
        let cfg       = ckpt.load_config()?;
        let model_cfg = cfg.model_config();
        let model     = ckpt.load_model(model_cfg.init::<B>(&device), BEST_MODEL, &device)?;

        if let Ok(info) = ckpt.read_info() {
            tracing::info!("Best checkpoint is from epoch {} (F1 {:.4})", info.epoch, info.f1);
        }
        Ok(Self { model, model_cfg, batch_size: cfg.batch_size, device })
    }

    pub fn predict(&self, store: &SampleStore) -> Result<Predictions> {
        ensure!(
            store.channel_dim() == self.model_cfg.in_channels,
            "archive has {} channels but the model expects {}",
            store.channel_dim(),
            self.model_cfg.in_channels
        );
        let positions = self.model_cfg.positions_per_sample(store.time_dim());
        ensure!(positions > 0, "samples of length {} are too short for the model", store.time_dim());
        predict(&self.model, store, self.batch_size, positions, &self.device)
    }
}
