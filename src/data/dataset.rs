use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::features::FeatureMatrix;

/// One scaled feature row with its raw target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionSample {
    pub features: Vec<f32>,
    pub target:   f32,
}

impl RegressionSample {
    /// Zip a matrix and its row-aligned targets into samples.
    pub fn from_rows(matrix: &FeatureMatrix, targets: &[f32]) -> Vec<Self> {
        matrix
            .rows
            .iter()
            .zip(targets)
            .map(|(row, &target)| Self { features: row.clone(), target })
            .collect()
    }
}

pub struct RegressionDataset {
    samples: Vec<RegressionSample>,
}

impl RegressionDataset {
    pub fn new(samples: Vec<RegressionSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<RegressionSample> for RegressionDataset {
    fn get(&self, index: usize) -> Option<RegressionSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
