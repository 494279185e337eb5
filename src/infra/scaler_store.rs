// ============================================================
// Layer 6 — Scaler Store
// ============================================================
// Persists the fitted feature scaler next to the checkpoint.
//
// The scaler is fit on the TRAINING rows only, during the train
// pass. The evaluate pass must apply the exact same per-column
// means and stds (and the exact same column order), so the fitted
// state goes to disk as JSON and is reloaded instead of refit.
// Refitting at evaluation time would silently change the inputs
// under the loaded weights.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::preprocessor::StandardScaler;

pub struct ScalerStore {
    dir: PathBuf,
}

impl ScalerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Write the fitted scaler as pretty JSON.
    pub fn save(&self, scaler: &StandardScaler) -> Result<()> {
        std::fs::create_dir_all(&self.dir).ok();
        let path = self.scaler_path();

        let json = serde_json::to_string_pretty(scaler)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Cannot write scaler to '{}'", path.display()))?;

        tracing::info!(
            "Scaler saved for {} feature columns to '{}'",
            scaler.feature_names.len(),
            path.display()
        );
        Ok(())
    }

    /// Load a previously saved scaler from its JSON file.
    pub fn load(&self) -> Result<StandardScaler> {
        let path = self.scaler_path();

        let json = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read scaler from '{}'. \
                 Make sure you have run 'train' before 'evaluate'.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }

    fn scaler_path(&self) -> PathBuf {
        self.dir.join("scaler.json")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::FeatureMatrix;

    #[test]
    fn test_scaler_roundtrip() {
        let dir = std::env::temp_dir().join("fp_scaler_store_test");
        std::fs::remove_dir_all(&dir).ok();
        let store = ScalerStore::new(dir.to_string_lossy().into_owned());

        let matrix = FeatureMatrix::new(
            vec!["games".into(), "yards".into()],
            vec![vec![16.0, 1200.0], vec![12.0, 800.0]],
        )
        .unwrap();
        let scaler = StandardScaler::fit(&matrix).unwrap();
        store.save(&scaler).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.feature_names, scaler.feature_names);
        assert_eq!(loaded.means, scaler.means);
        assert_eq!(loaded.stds, scaler.stds);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_scaler_is_an_error() {
        let dir = std::env::temp_dir().join("fp_scaler_missing_test");
        std::fs::remove_dir_all(&dir).ok();
        let store = ScalerStore::new(dir.to_string_lossy().into_owned());
        assert!(store.load().is_err());
        std::fs::remove_dir_all(dir).ok();
    }
}
