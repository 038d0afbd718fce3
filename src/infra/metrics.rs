// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per training epoch:
//
//   epoch,train_loss,val_f1,precision,recall,fpr,checkpointed
//   1,0.693147,0.000000,0.000000,0.000000,0.000000,true
//   2,0.512004,0.750000,0.800000,0.705882,0.031250,true
//
// The header is written only when the file is new, so repeated
// runs into the same directory extend one log.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::domain::metrics::ClassificationMetrics;

const CSV_HEADER: &str = "epoch,train_loss,val_f1,precision,recall,fpr,checkpointed";

/// One row of the per-epoch log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch: usize,

    /// Mean cross-entropy over the epoch's training batches
    pub train_loss: f64,

    /// Validation scores after the epoch
    pub val: ClassificationMetrics,

    /// Whether the best-model slot was written this epoch
    pub checkpointed: bool,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val: ClassificationMetrics, checkpointed: bool) -> Self {
        Self { epoch, train_loss, val, checkpointed }
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Open (or create) `metrics.csv` inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics dir '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot append to '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{}",
            m.epoch,
            m.train_loss,
            m.val.f1,
            m.val.precision,
            m.val.recall,
            m.val.fpr,
            m.checkpointed,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempfile::tempdir().unwrap();
        let val = ClassificationMetrics { precision: 0.8, recall: 0.8, f1: 0.8, fpr: 0.25 };

        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, val, true)).unwrap();

        // reopening must not duplicate the header
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(2, 0.25, val, false)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            CSV_HEADER,
            "1,0.500000,0.800000,0.800000,0.800000,0.250000,true",
            "2,0.250000,0.800000,0.800000,0.800000,0.250000,false",
        ]);
    }
}
