// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:          the epoch number (1, 2, 3, ...)
//   - train_loss:     mean cross-entropy over training batches
//   - valid_loss:     mean cross-entropy over validation batches
//   - valid_accuracy: fraction of validation samples classified correctly
//
// Output file: <checkpoint_dir>/<prefix>_metrics.csv
//
// Example CSV output:
//   epoch,train_loss,valid_loss,valid_accuracy
//   1,2.302100,2.297400,0.104000
//   2,2.190300,2.154800,0.187000
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If valid_loss increases while train_loss decreases → overfitting

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Average cross-entropy loss on the validation set
    pub valid_loss: f64,

    /// Range: [0.0, 1.0]
    pub valid_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, valid_loss: f64, valid_accuracy: f64) -> Self {
        Self { epoch, train_loss, valid_loss, valid_accuracy }
    }

    /// Returns true if this epoch improved over the previous best valid_loss
    pub fn is_improvement(&self, best_valid_loss: f64) -> bool {
        self.valid_loss < best_valid_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join(format!("{prefix}_metrics.csv"));

        // Appends to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,valid_loss,valid_accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.valid_loss,
            m.valid_accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, valid_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.valid_loss,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3, 0.2);
        // 2.3 < 3.0 → this is an improvement
        assert!(m.is_improvement(3.0));
        // 2.3 is NOT less than 2.0 → not an improvement
        assert!(!m.is_improvement(2.0));
        assert!(m.is_improvement(f64::INFINITY));
    }

    #[test]
    fn test_log_appends_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path(), "lstm").unwrap();
        logger.log(&EpochMetrics::new(1, 1.0, 0.9, 0.5)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.8, 0.7, 0.625)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,valid_loss,valid_accuracy");
        assert_eq!(lines[1], "1,1.000000,0.900000,0.500000");
        assert_eq!(lines[2], "2,0.800000,0.700000,0.625000");
    }

    #[test]
    fn test_reopening_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        MetricsLogger::new(dir.path(), "x").unwrap()
            .log(&EpochMetrics::new(1, 1.0, 1.0, 0.0)).unwrap();
        let again = MetricsLogger::new(dir.path(), "x").unwrap();
        let text = fs::read_to_string(again.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
