// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Persists and restores named parameter blobs with Burn's
// MessagePack file recorder (full precision).
//
// Layout of a checkpoint directory:
//
//   checkpoints/
//     best_model.mpk       ← model parameters of the best epoch
//     best_optimizer.mpk   ← Adam state at that epoch
//     best_epoch.json      ← { "epoch": 4, "f1": 0.83 }
//     train_config.json    ← hyperparameters to rebuild the model
//     metrics.csv          ← per-epoch log (see infra::metrics)
//
// The "best" slot is overwritten in place on every checkpoint.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Record, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::SeizureNet;

/// Name of the model blob written on every checkpoint
pub const BEST_MODEL: &str = "best_model";

/// Name of the optimizer blob written alongside it
pub const BEST_OPTIMIZER: &str = "best_optimizer";

type CheckpointRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// Which epoch the best slot currently holds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointInfo {
    pub epoch: usize,
    pub f1:    f64,
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create the manager, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a named blob, without the recorder's extension
    fn blob_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Persist any Burn record under `name`, replacing what was there.
    pub fn save_record<B: Backend, R: Record<B>>(&self, record: R, name: &str) -> Result<()> {
        let path = self.blob_path(name);
        <CheckpointRecorder as Recorder<B>>::record(&CheckpointRecorder::new(), record, path.clone())
            .with_context(|| format!("Failed to save checkpoint '{}'", path.display()))?;
        Ok(())
    }

    /// Restore a record previously written with `save_record`.
    pub fn load_record<B: Backend, R: Record<B>>(&self, name: &str, device: &B::Device) -> Result<R> {
        let path = self.blob_path(name);
        <CheckpointRecorder as Recorder<B>>::load(&CheckpointRecorder::new(), path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?", path.display())
            })
    }

    pub fn save_model<B: Backend>(&self, model: &SeizureNet<B>, name: &str) -> Result<()> {
        self.save_record::<B, _>(model.clone().into_record(), name)
    }

    /// Load the blob `name` into `model` (which fixes the architecture).
    pub fn load_model<B: Backend>(
        &self,
        model:  SeizureNet<B>,
        name:   &str,
        device: &B::Device,
    ) -> Result<SeizureNet<B>> {
        let record = self.load_record::<B, _>(name, device)?;
        tracing::info!("Loaded model parameters from '{}'", self.blob_path(name).display());
        Ok(model.load_record(record))
    }

    pub fn write_info(&self, info: &CheckpointInfo) -> Result<()> {
        let path = self.dir.join("best_epoch.json");
        fs::write(&path, serde_json::to_string(info)?)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        Ok(())
    }

    pub fn read_info(&self) -> Result<CheckpointInfo> {
        let path = self.dir.join("best_epoch.json");
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{}'. Have you run 'train' first?", path.display()))?;
        Ok(serde_json::from_str(&s)?)
    }

    /// Save the training configuration as JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' before 'evaluate'.",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::tests::tiny_config;
    use burn::backend::NdArray;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("ckpt")).unwrap();
        let cfg = TrainConfig { epochs: 3, patience: 2, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.epochs, 3);
        assert_eq!(loaded.patience, 2);
    }

    #[test]
    fn test_info_round_trip_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        assert!(ckpt.read_info().is_err());
        let info = CheckpointInfo { epoch: 4, f1: 0.5 };
        ckpt.write_info(&info).unwrap();
        assert_eq!(ckpt.read_info().unwrap(), info);
    }

    #[test]
    fn test_model_save_and_load_preserves_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let model: SeizureNet<NdArray> = tiny_config(2).init(&device);
        ckpt.save_model(&model, BEST_MODEL).unwrap();
        assert!(dir.path().join("best_model.mpk").exists());

        let fresh: SeizureNet<NdArray> = tiny_config(2).init(&device);
        let restored = ckpt.load_model(fresh, BEST_MODEL, &device).unwrap();

        let x = Tensor::<NdArray, 3>::ones([1, 2, 64], &device);
        let a: Vec<f32> = model.forward(x.clone()).into_data().iter::<f32>().collect();
        let b: Vec<f32> = restored.forward(x).into_data().iter::<f32>().collect();
        assert_eq!(a, b);
    }
}
