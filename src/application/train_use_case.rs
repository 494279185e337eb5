// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the player CSV       (Layer 4 - data)
//   Step 2: Select features + target  (Layer 3 - domain)
//   Step 3: Split train/val/test      (Layer 4 - data)
//   Step 4: Fit + apply the scaler    (Layer 4 - data)
//   Step 5: Build Burn datasets       (Layer 4 - data)
//   Step 6: Persist config + scaler   (Layer 6 - infra)
//   Step 7: Build the weighted loss   (Layer 5 - ml)
//   Step 8: Run training loop         (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::CsvLoader,
    preprocessor::StandardScaler,
    dataset::RegressionSample,
    dataset::RegressionDataset,
    splitter::three_way_split,
};
use crate::domain::{features::FeatureMatrix, traits::RecordSource};
use crate::ml::{loss::WeightedMseLoss, trainer::run_training};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    scaler_store::ScalerStore,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for evaluation:
// the evaluate command replays the same seeded split, so it must see
// the exact fractions and seed used here.
// The #[derive(Serialize, Deserialize)] macros from serde handle
// reading/writing this struct to JSON automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_csv:        String,
    pub checkpoint_dir:  String,
    pub target_col:      String,
    /// None means: every numeric column except the target, in header order
    pub features:        Option<Vec<String>>,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub lr:              f64,
    pub hidden_dim:      usize,
    pub dropout:         f64,
    pub high_threshold:  f64,
    pub low_threshold:   f64,
    pub high_weight:     f64,
    pub low_weight:      f64,
    pub very_low_weight: f64,
    pub test_fraction:   f64,
    pub val_fraction:    f64,
    pub seed:            u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_csv:        "data/player_stats.csv".to_string(),
            checkpoint_dir:  "models".to_string(),
            target_col:      "fantasy_points_per_game".to_string(),
            features:        None,
            batch_size:      32,
            epochs:          1000,
            lr:              1e-3,
            hidden_dim:      64,
            dropout:         0.1,
            high_threshold:  14.5,
            low_threshold:   4.0,
            high_weight:     6.0,
            low_weight:      1.0,
            very_low_weight: 3.0,
            test_fraction:   0.2,
            val_fraction:    0.2,
            seed:            42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the player CSV ───────────────────────────────────────
        // CsvLoader reads every row and works out which columns are numeric
        tracing::info!("Loading player stats from '{}'", cfg.data_csv);
        let loader = CsvLoader::new(&cfg.data_csv);
        let table  = loader.load_all()?;
        tracing::info!("Loaded {} player rows", table.n_rows());

        // ── Step 2: Select features and target ────────────────────────────────
        // Either the columns the user asked for, or every numeric column
        // except the target. Targets stay in raw points — they are never
        // scaled, so the loss thresholds keep their meaning.
        let (matrix, targets) =
            FeatureMatrix::from_table(&table, &cfg.target_col, cfg.features.as_deref())?;
        tracing::info!(
            "Selected {} feature columns for target '{}'",
            matrix.n_features(),
            cfg.target_col
        );

        // ── Step 3: Three-way split ───────────────────────────────────────────
        // Rows and targets travel together as pairs so the shuffle can't
        // separate them. The test partition is set aside untouched; the
        // evaluate command recreates it from the same seed.
        let pairs: Vec<(Vec<f32>, f32)> = matrix
            .rows
            .iter()
            .cloned()
            .zip(targets.iter().copied())
            .collect();
        let (train_pairs, val_pairs, test_pairs) =
            three_way_split(pairs, cfg.test_fraction, cfg.val_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation, {} test (held out)",
            train_pairs.len(),
            val_pairs.len(),
            test_pairs.len()
        );
        ensure!(
            !train_pairs.is_empty(),
            "No training rows left after the split — need more data or smaller hold-out fractions"
        );
        ensure!(
            !val_pairs.is_empty(),
            "No validation rows left after the split — need more data or smaller hold-out fractions"
        );

        // ── Step 4: Fit and apply the scaler ──────────────────────────────────
        // Fitted on the training partition only, then applied to both.
        // Fitting on everything would leak validation statistics into
        // training.
        let (train_rows, train_targets): (Vec<Vec<f32>>, Vec<f32>) =
            train_pairs.into_iter().unzip();
        let (val_rows, val_targets): (Vec<Vec<f32>>, Vec<f32>) =
            val_pairs.into_iter().unzip();

        let train_matrix = FeatureMatrix::new(matrix.feature_names.clone(), train_rows)?;
        let val_matrix   = FeatureMatrix::new(matrix.feature_names.clone(), val_rows)?;

        let scaler       = StandardScaler::fit(&train_matrix)?;
        let train_scaled = scaler.transform(&train_matrix)?;
        let val_scaled   = scaler.transform(&val_matrix)?;

        // ── Step 5: Build Burn datasets ───────────────────────────────────────
        // RegressionDataset implements Burn's Dataset trait so the
        // DataLoader can call .get(index) and .len() on it
        let input_dim     = train_scaled.n_features();
        let train_dataset = RegressionDataset::new(RegressionSample::from_rows(
            &train_scaled,
            &train_targets,
        ));
        let val_dataset = RegressionDataset::new(RegressionSample::from_rows(
            &val_scaled,
            &val_targets,
        ));

        // ── Step 6: Persist config and scaler ─────────────────────────────────
        // Evaluation needs the config to rebuild the model and replay the
        // split, and the scaler to standardise inputs identically
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        ScalerStore::new(&cfg.checkpoint_dir).save(&scaler)?;

        // ── Step 7: Build the weighted loss ───────────────────────────────────
        // High scorers are rare but decide fantasy matchups, so errors
        // there cost more than errors in the mid-range
        let criterion = WeightedMseLoss::new(
            cfg.high_threshold,
            cfg.low_threshold,
            cfg.high_weight,
            cfg.low_weight,
            cfg.very_low_weight,
        );

        // ── Step 8: Run training loop (Layer 5) ───────────────────────────────
        let logger = MetricsLogger::new(&cfg.checkpoint_dir)?;
        run_training(
            cfg,
            input_dim,
            train_dataset,
            val_dataset,
            criterion,
            ckpt_manager,
            logger,
        )?;

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// A tiny but learnable CSV: points scale with yards and tds
    fn write_fixture_csv(path: &std::path::Path) {
        let mut f = std::fs::File::create(path).unwrap();
        writeln!(f, "player,games,yards,tds,fantasy_points_per_game").unwrap();
        for i in 0..30 {
            let games = 10 + (i % 7);
            let yards = 300 + i * 40;
            let tds   = i % 9;
            let points = yards as f64 / 100.0 + tds as f64 * 0.8;
            writeln!(f, "P{i},{games},{yards},{tds},{points:.2}").unwrap();
        }
    }

    #[test]
    fn test_execute_writes_all_artifacts() {
        let dir = std::env::temp_dir().join("fp_train_use_case_test");
        std::fs::create_dir_all(&dir).unwrap();
        let csv_path = dir.join("players.csv");
        write_fixture_csv(&csv_path);

        let ckpt_dir = dir.join("models");
        let mut cfg = TrainConfig::default();
        cfg.data_csv       = csv_path.to_string_lossy().to_string();
        cfg.checkpoint_dir = ckpt_dir.to_string_lossy().to_string();
        cfg.epochs         = 25;
        cfg.hidden_dim     = 8;
        cfg.batch_size     = 8;
        cfg.dropout        = 0.0;
        cfg.seed           = 11;

        TrainUseCase::new(cfg).execute().unwrap();

        assert!(ckpt_dir.join("best_model.mpk.gz").exists());
        assert!(ckpt_dir.join("train_config.json").exists());
        assert!(ckpt_dir.join("scaler.json").exists());
        assert!(ckpt_dir.join("metrics.csv").exists());

        // The saved config must round-trip the split parameters, since
        // evaluation replays the split from them
        let reloaded = CheckpointManager::new(ckpt_dir.to_string_lossy().as_ref())
            .load_config()
            .unwrap();
        assert_eq!(reloaded.seed, 11);
        assert_eq!(reloaded.target_col, "fantasy_points_per_game");

        std::fs::remove_dir_all(&dir).ok();
    }
}
