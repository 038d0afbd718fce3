// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Load the archive            (Layer 4 - data)
//   Step 2: Wrap it in a SampleStore    (Layer 4 - data)
//   Step 3: Split train/validation      (Layer 4 - data)
//   Step 4: Save config                 (Layer 6 - infra)
//   Step 5: Run training loop           (Layer 5 - ml)

use anyhow::{ensure, Result};
use burn::module::Module;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{loader::ArchiveFile, splitter::split_store, store::SampleStore};
use crate::domain::traits::{ArchiveSource, SampleSource};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    model::SeizureNetConfig,
    trainer::{ensure_binary_labels, run_training},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Hyperparameters for one run. Saved next to the checkpoints so
// evaluation can rebuild the exact architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_file:      String,
    pub checkpoint_dir: String,
    /// Checkpoint directory to warm-start from
    #[serde(default)]
    pub init_from:      Option<String>,
    pub in_channels:    usize,
    pub time_dim:       usize,
    pub n_filters:      usize,
    pub head_hidden:    usize,
    pub head_kernel:    usize,
    pub pool:           usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub patience:       usize,
    pub lr:             f64,
    pub train_fraction: f64,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_file:      "data/data.bin".to_string(),
            checkpoint_dir: "models".to_string(),
            init_from:      None,
            in_channels:    18,
            time_dim:       1024,
            n_filters:      128,
            head_hidden:    100,
            head_kernel:    16,
            pool:           4,
            batch_size:     32,
            epochs:         20,
            patience:       5,
            lr:             1e-4,
            train_fraction: 0.8,
            seed:           42,
        }
    }
}

impl TrainConfig {
    pub fn model_config(&self) -> SeizureNetConfig {
        SeizureNetConfig::new(self.in_channels)
            .with_n_filters(self.n_filters)
            .with_head_hidden(self.head_hidden)
            .with_head_kernel(self.head_kernel)
            .with_pool(self.pool)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1-2: Load the archive into a store ──────────────────────────
        let archive = ArchiveFile::new(&cfg.data_file).load()?;
        let store = SampleStore::from_archive(archive);
        ensure!(store.has_labels(), "'{}' carries no labels; cannot train on it", cfg.data_file);
        ensure!(
            store.channel_dim() == cfg.in_channels && store.time_dim() == cfg.time_dim,
            "'{}' holds {}x{} samples, config expects {}x{}",
            cfg.data_file,
            store.channel_dim(),
            store.time_dim(),
            cfg.in_channels,
            cfg.time_dim,
        );
        for (label, n) in store.label_counts() {
            tracing::info!("label {}: {} samples", label, n);
        }
        ensure_binary_labels(&store)?;

        // ── Step 3: Train / validation split ─────────────────────────────────
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let (train, val) = split_store(&store, cfg.train_fraction, &mut rng)?;
        tracing::info!("Split: {} train, {} validation", train.len(), val.len());
        ensure!(
            !train.is_empty() && !val.is_empty(),
            "{} samples cannot fill both a training and a validation set",
            store.len()
        );

        // ── Step 4: Save config for evaluation ───────────────────────────────
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt.save_config(cfg)?;

        // ── Step 5: Run training loop (Layer 5) ──────────────────────────────
        let outcome = run_training(cfg, &train, &val, &ckpt)?;
        tracing::info!(
            "Ran {} epochs; model has {} parameters",
            outcome.history.len(),
            outcome.model.num_params()
        );
        match outcome.best {
            Some(info) => println!(
                "Best model: epoch {} with validation F1 = {:.4} (saved in '{}')",
                info.epoch, info.f1, cfg.checkpoint_dir
            ),
            None => println!("No epoch was checkpointed"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_geometry() {
        let cfg = TrainConfig::default();
        let model = cfg.model_config();
        assert_eq!(model.in_channels, 18);
        assert_eq!(model.positions_per_sample(cfg.time_dim), 1);
    }

    #[test]
    fn test_config_without_init_from_deserialises() {
        let mut json = serde_json::to_value(TrainConfig::default()).unwrap();
        json.as_object_mut().unwrap().remove("init_from");
        let cfg: TrainConfig = serde_json::from_value(json).unwrap();
        assert!(cfg.init_from.is_none());
    }

    #[test]
    fn test_label_outside_binary_range_rejected_before_training() {
        use crate::data::{archive::Archive, loader::write_archive};
        use crate::domain::sample::Matrix;

        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.bin");
        let samples = vec![Matrix::zeros(2, 64); 3];
        write_archive(&data, &Archive::new(samples, Some(vec![0, 2, 1])).unwrap()).unwrap();

        let cfg = TrainConfig {
            data_file:      data.to_string_lossy().into_owned(),
            checkpoint_dir: dir.path().join("models").to_string_lossy().into_owned(),
            in_channels:    2,
            time_dim:       64,
            ..TrainConfig::default()
        };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("0 or 1"));
        assert!(!dir.path().join("models").exists());
    }
}
