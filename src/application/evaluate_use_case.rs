// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores the best checkpoint on a held-out archive:
//   load config + model → run over the archive in order →
//   print precision / recall / F1 / FPR, optionally log logits.

use anyhow::{ensure, Result};
use burn::prelude::Backend;

use crate::data::{loader::ArchiveFile, store::SampleStore};
use crate::domain::{metrics::ClassificationMetrics, traits::{ArchiveSource, SampleSource}};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::evaluator::{append_logits_log, InferBackend, Inferencer};

pub struct EvaluateUseCase {
    checkpoint_dir: String,
    data_file:      String,
    outputs_log:    Option<String>,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: String, data_file: String, outputs_log: Option<String>) -> Self {
        Self { checkpoint_dir, data_file, outputs_log }
    }

    /// Score on the GPU backend and print the result.
    pub fn execute(&self) -> Result<ClassificationMetrics> {
        let m = self.score::<InferBackend>(burn::backend::wgpu::WgpuDevice::default())?;
        println!(
            "F1 = {:.4}, Precision = {:.4}, Recall = {:.4}, FPR = {:.4}",
            m.f1, m.precision, m.recall, m.fpr
        );
        Ok(m)
    }

    pub fn score<B: Backend>(&self, device: B::Device) -> Result<ClassificationMetrics> {
        let ckpt = CheckpointManager::new(&self.checkpoint_dir)?;
        let store = SampleStore::from_archive(ArchiveFile::new(&self.data_file).load()?);
        ensure!(store.has_labels(), "'{}' carries no labels; nothing to score against", self.data_file);

        let inferencer = Inferencer::<B>::from_checkpoint(&ckpt, device)?;
        tracing::info!("Testing the model on {} samples", store.len());
        let predictions = inferencer.predict(&store)?;
        if let Some(path) = &self.outputs_log {
            append_logits_log(path, &predictions)?;
        }
        Ok(predictions.metrics())
    }
}
