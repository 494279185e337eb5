// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved in the checkpoint directory:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. train_config.json            — the full training config
//   3. scaler.json                  — the fitted feature scaler
//      (written by the scaler store, not this manager)
//
// There is exactly ONE weights file, `best_model`, and the
// trainer only overwrites it when validation loss strictly
// improves. Whatever is on disk after training is the best
// model seen, not the last one.
//
// Why save the config separately?
//   When loading for evaluation, we need the exact model shape
//   (hidden_dim, dropout) to rebuild the model before loading
//   the weights into it, and the exact data settings (seed,
//   fractions, columns) to rebuild the same partitions.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{HalfPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde_json;

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::MlpRegressor;

/// File stem of the weights blob (CompactRecorder adds `.mpk.gz`)
const BEST_MODEL_STEM: &str = "best_model";

/// Manages saving and loading of the best checkpoint.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    /// Path to the directory where checkpoint files are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        // create_dir_all creates parent directories too, like `mkdir -p`
        // .ok() ignores the error if the directory already exists
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// The directory this manager writes into
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Save model weights as the new best checkpoint, replacing
    /// whatever was there before.
    ///
    /// Uses Burn's CompactRecorder which:
    ///   1. Calls model.into_record() to extract all parameters
    ///   2. Serialises to MessagePack binary format
    ///   3. Compresses with gzip
    ///   4. Writes to {dir}/best_model.mpk.gz
    pub fn save_best<B: AutodiffBackend>(&self, model: &MlpRegressor<B>) -> Result<()> {
        // Build the file path (without extension — recorder adds it)
        let path = self.dir.join(BEST_MODEL_STEM);

        NamedMpkGzFileRecorder::<HalfPrecisionSettings>::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        tracing::debug!("Saved best checkpoint to '{}'", path.display());
        Ok(())
    }

    /// Load the best checkpoint's weights into the given model.
    ///
    /// The model parameter must have the correct architecture
    /// (matching the saved checkpoint) or loading will fail.
    /// load_record() returns a new model with the loaded weights.
    pub fn load_best<B: Backend>(
        &self,
        model:  MlpRegressor<B>,
        device: &B::Device,
    ) -> Result<MlpRegressor<B>> {
        let path = self.dir.join(BEST_MODEL_STEM);

        tracing::info!("Loading checkpoint from '{}'", path.display());

        let record = NamedMpkGzFileRecorder::<HalfPrecisionSettings>::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    ///
    /// This must be called before training starts so the
    /// evaluator can reconstruct the exact model architecture
    /// and data partitions.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");

        // serde_json::to_string_pretty adds indentation for readability
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    ///
    /// Called by the evaluator to know what settings were used
    /// during training so it can rebuild the same model and splits.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'evaluate'.",
                    path.display()
                )
            })?;

        // Deserialise JSON back into TrainConfig struct
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = std::env::temp_dir().join("fp_ckpt_config_test");
        let manager = CheckpointManager::new(dir.to_string_lossy().into_owned());

        let mut cfg = TrainConfig::default();
        cfg.epochs = 17;
        cfg.seed = 123;
        manager.save_config(&cfg).unwrap();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.epochs, 17);
        assert_eq!(loaded.seed, 123);
        assert_eq!(loaded.target_col, cfg.target_col);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let dir = std::env::temp_dir().join("fp_ckpt_missing_test");
        std::fs::remove_dir_all(&dir).ok();
        let manager = CheckpointManager::new(dir.to_string_lossy().into_owned());
        assert!(manager.load_config().is_err());
        std::fs::remove_dir_all(dir).ok();
    }
}
