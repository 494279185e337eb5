// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Scores the best checkpoint on the same partitions the trainer
// saw, then renders the diagnostic charts:
//   1. Reload config, scaler and model weights
//   2. Replay the seeded split on the player CSV
//   3. RMSE / MAE / R² on the train and test partitions
//   4. Permutation importances, correlation matrix,
//      scatter and distribution plots under results_dir

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;

use crate::application::train_use_case::TrainConfig;
use crate::data::{loader::CsvLoader, preprocessor::StandardScaler, splitter::three_way_split};
use crate::domain::{features::FeatureMatrix, traits::RecordSource};
use crate::infra::{checkpoint::CheckpointManager, plot, scaler_store::ScalerStore};
use crate::ml::{importance::permutation_importance, metrics, predictor::Predictor};

pub struct EvaluateUseCase {
    results_dir: String,
    data_csv:    String,
    config:      TrainConfig,
    scaler:      StandardScaler,
    predictor:   Predictor,
}

impl EvaluateUseCase {
    /// Load everything the evaluation needs up front, so a missing
    /// checkpoint fails here with a clear message instead of halfway
    /// through the diagnostics.
    pub fn new(
        checkpoint_dir: String,
        results_dir:    String,
        data_csv:       Option<String>,
    ) -> Result<Self> {
        let ckpt      = CheckpointManager::new(&checkpoint_dir);
        let config    = ckpt.load_config()?;
        let scaler    = ScalerStore::new(&checkpoint_dir).load()?;
        let predictor = Predictor::from_checkpoint(&ckpt, scaler.feature_names.len())?;
        let data_csv  = data_csv.unwrap_or_else(|| config.data_csv.clone());
        Ok(Self { results_dir, data_csv, config, scaler, predictor })
    }

    /// Run the full diagnostic pass and write the charts
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Reload the data and replay the split ──────────────────────
        // The scaler's column list pins the feature set: even if the CSV
        // gained columns since training, we select exactly the columns the
        // model was trained on, in the same order. Same fractions + same
        // seed reproduce the same partitions.
        tracing::info!("Loading player stats from '{}'", self.data_csv);
        let table = CsvLoader::new(&self.data_csv).load_all()?;
        let (matrix, targets) =
            FeatureMatrix::from_table(&table, &cfg.target_col, Some(&self.scaler.feature_names))?;

        let pairs: Vec<(Vec<f32>, f32)> = matrix
            .rows
            .iter()
            .cloned()
            .zip(targets.iter().copied())
            .collect();
        let (train_pairs, _val_pairs, test_pairs) =
            three_way_split(pairs, cfg.test_fraction, cfg.val_fraction, cfg.seed);
        ensure!(
            !train_pairs.is_empty() && !test_pairs.is_empty(),
            "Replaying the split left an empty partition — was the CSV truncated since training?"
        );
        tracing::info!(
            "Scoring {} train rows and {} test rows",
            train_pairs.len(),
            test_pairs.len()
        );

        let (train_rows, train_targets): (Vec<Vec<f32>>, Vec<f32>) =
            train_pairs.into_iter().unzip();
        let (test_rows, test_targets): (Vec<Vec<f32>>, Vec<f32>) =
            test_pairs.into_iter().unzip();
        let train_scaled = self
            .scaler
            .transform(&FeatureMatrix::new(matrix.feature_names.clone(), train_rows)?)?;
        let test_scaled = self
            .scaler
            .transform(&FeatureMatrix::new(matrix.feature_names.clone(), test_rows)?)?;

        // ── Step 2: Regression metrics on both partitions ─────────────────────
        // A big train/test gap here is the overfitting signal
        let train_preds = self.predictor.predict_batch(&train_scaled)?;
        let test_preds  = self.predictor.predict_batch(&test_scaled)?;
        report_split_metrics("Training", &train_targets, &train_preds);
        report_split_metrics("Testing", &test_targets, &test_preds);

        std::fs::create_dir_all(&self.results_dir)?;
        let out = Path::new(&self.results_dir);

        // ── Step 3: Scatter of test actual vs predicted ───────────────────────
        plot::scatter_actual_vs_predicted(
            &out.join("actual_vs_predicted.png"),
            &test_targets,
            &test_preds,
        )?;

        // ── Step 4: Permutation feature importances ───────────────────────────
        // Shuffling a column and watching test MSE rise tells us how much
        // the model leans on that column
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let importances = permutation_importance(
            &self.predictor,
            &test_scaled,
            &test_targets,
            metrics::mean_squared_error,
            &mut rng,
        )?;

        println!("\nPermutation Feature Importances (MSE increase when shuffled):");
        let mut ranked: Vec<(&String, f64)> = matrix
            .feature_names
            .iter()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (name, value) in &ranked {
            println!("  {:<24} {:+.4}", name, value);
        }

        plot::feature_importance_bars(
            &out.join("feature_importances.png"),
            &matrix.feature_names,
            &importances,
        )?;

        // ── Step 5: Correlation matrix over the raw columns ───────────────────
        // Computed on UNSCALED values — Pearson correlation is unchanged by
        // standardisation anyway, and raw units are what the analyst knows
        let mut columns: Vec<Vec<f64>> = (0..matrix.n_features())
            .map(|j| matrix.column(j).iter().map(|&v| v as f64).collect())
            .collect();
        columns.push(targets.iter().map(|&v| v as f64).collect());
        let mut labels = matrix.feature_names.clone();
        labels.push(cfg.target_col.clone());

        let corr = metrics::correlation_matrix(&columns);
        plot::correlation_heatmap(&out.join("correlation_matrix.png"), &labels, &corr)?;

        // ── Step 6: Score distributions and their overlap ─────────────────────
        let overlap = metrics::distribution_overlap(&test_targets, &test_preds);
        plot::distribution_curves(
            &out.join("distribution_curve.png"),
            &test_targets,
            &test_preds,
        )?;
        println!("Distribution Overlap: {:.4}", overlap);

        Ok(())
    }
}

/// Print one partition's metric line in the fixed report format
fn report_split_metrics(label: &str, actual: &[f32], predicted: &[f32]) {
    let rmse = metrics::root_mean_squared_error(actual, predicted);
    let mae  = metrics::mean_absolute_error(actual, predicted);
    let r2   = metrics::r2_score(actual, predicted);
    println!("{} RMSE: {:.4}, MAE: {:.4}, R²: {:.4}", label, rmse, mae, r2);
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainUseCase;
    use std::io::Write;

    fn write_fixture_csv(path: &std::path::Path) {
        let mut f = std::fs::File::create(path).unwrap();
        writeln!(f, "player,games,yards,tds,fantasy_points_per_game").unwrap();
        for i in 0..40 {
            let games = 10 + (i % 7);
            let yards = 250 + i * 35;
            let tds   = i % 10;
            let points = yards as f64 / 90.0 + tds as f64 * 0.7;
            writeln!(f, "P{i},{games},{yards},{tds},{points:.2}").unwrap();
        }
    }

    /// Full train-then-evaluate round trip on a small synthetic CSV
    #[test]
    fn test_evaluate_after_training_writes_all_charts() {
        let dir = std::env::temp_dir().join("fp_evaluate_use_case_test");
        std::fs::create_dir_all(&dir).unwrap();
        let csv_path = dir.join("players.csv");
        write_fixture_csv(&csv_path);

        let ckpt_dir    = dir.join("models");
        let results_dir = dir.join("results");

        let mut cfg = TrainConfig::default();
        cfg.data_csv       = csv_path.to_string_lossy().to_string();
        cfg.checkpoint_dir = ckpt_dir.to_string_lossy().to_string();
        cfg.epochs         = 25;
        cfg.hidden_dim     = 8;
        cfg.batch_size     = 8;
        cfg.dropout        = 0.0;
        cfg.seed           = 3;
        TrainUseCase::new(cfg).execute().unwrap();

        let use_case = EvaluateUseCase::new(
            ckpt_dir.to_string_lossy().to_string(),
            results_dir.to_string_lossy().to_string(),
            None,
        )
        .unwrap();
        use_case.execute().unwrap();

        for name in [
            "actual_vs_predicted.png",
            "feature_importances.png",
            "correlation_matrix.png",
            "distribution_curve.png",
        ] {
            assert!(results_dir.join(name).exists(), "missing chart: {name}");
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    /// A missing checkpoint directory should fail in new(), before any work
    #[test]
    fn test_new_fails_without_checkpoint() {
        let missing = std::env::temp_dir()
            .join("fp_evaluate_no_ckpt")
            .to_string_lossy()
            .to_string();
        let result = EvaluateUseCase::new(missing, "unused".to_string(), None);
        assert!(result.is_err());
    }
}
