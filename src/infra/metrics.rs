// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Why log metrics to CSV?
//   - Easy to open in Excel or Google Sheets
//   - Can plot learning curves to diagnose training issues
//   - Provides a permanent record of each training run
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average weighted-MSE loss on training batches
//   - val_loss:   average weighted-MSE loss on validation batches
//
// Output file: models/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,val_loss
//   1,34.124500,31.089200
//   2,28.890100,27.854300
//   ...
//
// How to read the metrics:
//   - Loss should trend down each epoch (model is learning)
//   - If val_loss rises while train_loss falls → overfitting;
//     the best-checkpoint rule keeps the pre-overfit weights
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average weighted-MSE loss over all training batches
    pub train_loss: f64,

    /// Average weighted-MSE loss on the validation set
    /// Should track train_loss — divergence indicates overfitting
    pub val_loss: f64,
}

impl EpochMetrics {
    /// Create a new EpochMetrics record
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64) -> Self {
        Self { epoch, train_loss, val_loss }
    }

    /// Returns true if this epoch improved over the previous best val_loss.
    /// Strictly lower — matching the old best is NOT an improvement,
    /// so the checkpoint on disk never changes on a tie.
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
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
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());

        // Create directory if it doesn't exist
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write CSV header only if file is new
        // This allows appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            // Write the header row
            writeln!(f, "epoch,train_loss,val_loss")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    ///
    /// Uses OpenOptions with append=true so we add to the file
    /// without overwriting previous epochs.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        // Open in append mode — adds to end of file
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        // Write one CSV row with 6 decimal places for each metric
        writeln!(
            f,
            "{},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3);
        // 2.3 < 3.0 → this is an improvement
        assert!(m.is_improvement(3.0));
        // 2.3 is NOT less than 2.0 → not an improvement
        assert!(!m.is_improvement(2.0));
        // Exactly equal is NOT an improvement either
        assert!(!m.is_improvement(2.3));
    }

    #[test]
    fn test_checkpoint_decisions_over_a_run() {
        // A run whose validation losses go 5.0, 3.0, 4.0, 2.0
        // should write the checkpoint at epochs 1, 2 and 4.
        let losses = [5.0, 3.0, 4.0, 2.0];
        let mut best = f64::INFINITY;
        let mut wrote = Vec::new();

        for (i, &val_loss) in losses.iter().enumerate() {
            let m = EpochMetrics::new(i + 1, 0.0, val_loss);
            if m.is_improvement(best) {
                best = m.val_loss;
                wrote.push(m.epoch);
            }
        }

        assert_eq!(wrote, vec![1, 2, 4]);
    }
}
