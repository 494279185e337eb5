// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key backend split:
//   - Training uses MyBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns model on MyInnerBackend (NdArray)
//   - Validation batcher must also use MyInnerBackend, so the
//     validation pass carries no autodiff graph at all
//
// The loss criterion is built by the caller and passed in —
// the loop applies whatever shaping it was given and never
// inspects the thresholds itself.
//
// Checkpointing: only when validation loss strictly improves on
// the best seen so far. After the final epoch the weights on
// disk are the best ones, which is what evaluation loads.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::RegressionBatcher, dataset::RegressionDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::loss::WeightedMseLoss;
use crate::ml::model::{MlpRegressor, MlpRegressorConfig};

type MyBackend      = burn::backend::Autodiff<burn::backend::NdArray>;
type MyInnerBackend = burn::backend::NdArray;

pub fn run_training(
    cfg:           &TrainConfig,
    input_dim:     usize,
    train_dataset: RegressionDataset,
    val_dataset:   RegressionDataset,
    criterion:     WeightedMseLoss,
    ckpt_manager:  CheckpointManager,
    logger:        MetricsLogger,
) -> Result<()> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using ndarray device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = MlpRegressorConfig::new(input_dim, cfg.hidden_dim, cfg.dropout);
    let mut model: MlpRegressor<MyBackend> = model_cfg.init(&device);
    tracing::info!("Model ready: {} inputs, hidden_dim={}", input_dim, cfg.hidden_dim);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    // shuffle() re-permutes the rows on every pass, so each epoch
    // sees the batches in a fresh order
    let train_batcher = RegressionBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    // No shuffle: validation rows are visited in a fixed order
    let val_batcher = RegressionBatcher::<MyInnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut best_val_loss = f64::INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum  = 0.0f64;
        let mut train_batches   = 0usize;
        let mut last_batch_loss = f64::NAN;

        for batch in train_loader.iter() {
            let predictions = model.forward(batch.features);
            let loss = criterion.forward(predictions, batch.targets);

            last_batch_loss = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += last_batch_loss;
            train_batches  += 1;

            // Backward pass + Adam update — each batch starts from
            // fresh gradients, nothing accumulates across batches
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → MlpRegressor<MyInnerBackend>
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;

        for batch in val_loader.iter() {
            let predictions = model_valid.forward(batch.features);
            let loss = criterion.forward(predictions, batch.targets);

            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else { f64::NAN };

        // ── Checkpoint on strict improvement ──────────────────────────────────
        let metrics = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss);
        if metrics.is_improvement(best_val_loss) {
            best_val_loss = avg_val_loss;
            ckpt_manager.save_best(&model)?;
            tracing::debug!(
                "New best val_loss {:.6} at epoch {} — checkpoint updated",
                best_val_loss, epoch,
            );
        }

        logger.log(&metrics)?;

        // Progress line every 100th epoch, showing the LAST training
        // batch's loss next to the epoch's mean validation loss
        if epoch % 100 == 0 {
            println!(
                "Epoch [{}/{}], Loss: {:.4}, Val Loss: {:.4}",
                epoch, cfg.epochs, last_batch_loss, avg_val_loss,
            );
        }
    }

    tracing::info!("Training complete! Best val_loss: {:.6}", best_val_loss);
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::RegressionSample;
    use crate::domain::features::FeatureMatrix;
    use crate::ml::metrics::r2_score;
    use crate::ml::predictor::Predictor;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Rows where the target is feature 0 plus a little noise —
    /// a signal any regressor should pick up
    fn synthetic_samples(n: usize, d: usize, seed: u64) -> Vec<RegressionSample> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let features: Vec<f32> = (0..d).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
                let noise: f32 = rng.gen_range(-0.1f32..0.1);
                RegressionSample { target: features[0] + noise, features }
            })
            .collect()
    }

    #[test]
    fn test_training_learns_a_linear_signal() {
        let dir = std::env::temp_dir().join("fp_trainer_e2e_test");
        std::fs::remove_dir_all(&dir).ok();
        let dir_str = dir.to_string_lossy().into_owned();

        let mut cfg = TrainConfig::default();
        cfg.checkpoint_dir = dir_str.clone();
        cfg.epochs         = 1000;
        cfg.hidden_dim     = 32;
        cfg.dropout        = 0.0;
        cfg.batch_size     = 32;
        cfg.seed           = 7;

        let samples = synthetic_samples(100, 5, 7);
        let (train, val) = samples.split_at(80);

        let manager = CheckpointManager::new(dir_str.clone());
        manager.save_config(&cfg).unwrap();
        let logger = MetricsLogger::new(dir_str.clone()).unwrap();

        run_training(
            &cfg,
            5,
            RegressionDataset::new(train.to_vec()),
            RegressionDataset::new(val.to_vec()),
            WeightedMseLoss::new(14.5, 4.0, 1.0, 1.0, 1.0),
            manager,
            logger,
        )
        .unwrap();

        // The best checkpoint and the metrics log both exist
        assert!(dir.join("best_model.mpk.gz").exists());
        assert!(dir.join("metrics.csv").exists());

        // Reload the best model and score fresh rows from the same signal
        let manager = CheckpointManager::new(dir_str);
        let predictor = Predictor::from_checkpoint(&manager, 5).unwrap();

        let held_out = synthetic_samples(30, 5, 8);
        let names: Vec<String> = (0..5).map(|j| format!("f{}", j)).collect();
        let rows: Vec<Vec<f32>> = held_out.iter().map(|s| s.features.clone()).collect();
        let targets: Vec<f32> = held_out.iter().map(|s| s.target).collect();
        let matrix = FeatureMatrix::new(names, rows).unwrap();

        let predictions = predictor.predict_batch(&matrix).unwrap();
        let r2 = r2_score(&targets, &predictions);
        assert!(r2 > 0.5, "expected the model to learn the signal, r2 = {}", r2);

        std::fs::remove_dir_all(dir).ok();
    }
}
