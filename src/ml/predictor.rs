// ============================================================
// Layer 5 — Predictor
// ============================================================
use anyhow::Result;
use burn::prelude::*;

use crate::domain::features::FeatureMatrix;
use crate::domain::traits::PointsPredictor;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{MlpRegressor, MlpRegressorConfig};

type InferBackend = burn::backend::NdArray;

pub struct Predictor {
    model:  MlpRegressor<InferBackend>,
    device: burn::backend::ndarray::NdArrayDevice,
}

impl Predictor {
    /// Rebuild the trained model from the checkpoint directory.
    /// Dropout is pinned to 0.0 — inference must be deterministic.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        input_dim:    usize,
    ) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        let model_cfg = MlpRegressorConfig::new(input_dim, cfg.hidden_dim, 0.0);
        let model: MlpRegressor<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_best(model, &device)?;

        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// Predict one score per row of an already-scaled feature matrix.
    /// Runs on the plain backend: no gradient tracking, no dropout.
    pub fn predict_batch(&self, features: &FeatureMatrix) -> Result<Vec<f32>> {
        let n_rows = features.n_rows();
        if n_rows == 0 {
            return Ok(Vec::new());
        }

        let flat = features.to_flat();
        let input = Tensor::<InferBackend, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([n_rows, features.n_features()]);

        // forward → [n_rows, 1], flatten back to a plain Vec
        let predictions = self.model.forward(input);
        predictions
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read predictions off the backend: {e:?}"))
    }
}

impl PointsPredictor for Predictor {
    fn predict_batch(&self, features: &FeatureMatrix) -> Result<Vec<f32>> {
        Predictor::predict_batch(self, features)
    }
}
