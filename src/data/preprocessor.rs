// ============================================================
// Layer 4 — Feature Standardizer
// ============================================================
// Z-score standardization of the feature matrix before training.
//
// Why standardize at all?
//   Season stats live on wildly different scales:
//   - games played        → 0 to 17
//   - rushing yards       → 0 to ~2000
//   - yards per attempt   → 0 to ~10
//
//   Feeding raw columns like these into one linear layer makes the
//   large-scale columns dominate the gradient and slows convergence.
//   Mapping every column to (x - mean) / std puts them on a common
//   scale and lets one learning rate work for all of them.
//
// Two rules the rest of the pipeline relies on:
//   1. Fit on the TRAINING rows only, then apply the same parameters
//      to validation and test. Fitting on everything would leak
//      hold-out statistics into training.
//   2. Targets are never scaled — the loss-region thresholds are in
//      raw points per game, and predictions must come out in the
//      same units.
//
// A constant column has std 0; its divisor is clamped to 1 so the
// transform stays finite (the column just becomes all zeros).
//
// Reference: Rust Book §11 (Writing Automated Tests)
//            Burn Book §4 (Data preparation)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::features::FeatureMatrix;

/// Columns with std below this are treated as constant
const STD_FLOOR: f64 = 1e-12;

/// Per-column standardization parameters, fit once on the training
/// partition and persisted as JSON next to the checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Feature names in column order, recorded so evaluation can
    /// verify it is scaling the same columns training saw
    pub feature_names: Vec<String>,

    /// Per-column mean over the fitting rows
    pub means: Vec<f64>,

    /// Per-column standard deviation over the fitting rows
    /// (population form, constant columns clamped to 1.0)
    pub stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column mean and std on the given matrix.
    pub fn fit(matrix: &FeatureMatrix) -> Result<Self> {
        if matrix.n_rows() == 0 {
            bail!("cannot fit a scaler on an empty matrix");
        }

        let n = matrix.n_rows() as f64;
        let d = matrix.n_features();

        let mut means = vec![0.0f64; d];
        for row in &matrix.rows {
            for (j, &v) in row.iter().enumerate() {
                means[j] += v as f64;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0f64; d];
        for row in &matrix.rows {
            for (j, &v) in row.iter().enumerate() {
                let centered = v as f64 - means[j];
                stds[j] += centered * centered;
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
            if *std < STD_FLOOR {
                *std = 1.0;
            }
        }

        Ok(Self {
            feature_names: matrix.feature_names.clone(),
            means,
            stds,
        })
    }

    /// Apply the fitted transform, returning a new matrix.
    /// The input must have the same columns the scaler was fit on.
    pub fn transform(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        if matrix.feature_names != self.feature_names {
            bail!(
                "scaler was fit on columns [{}] but got [{}]",
                self.feature_names.join(", "),
                matrix.feature_names.join(", ")
            );
        }

        let rows = matrix
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| ((v as f64 - self.means[j]) / self.stds[j]) as f32)
                    .collect()
            })
            .collect();

        FeatureMatrix::new(self.feature_names.clone(), rows)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// These tests run with `cargo test` and verify the scaling logic.
// Reference: Rust Book §11 (Writing Automated Tests)
#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f32>>) -> FeatureMatrix {
        let d = rows.first().map(|r| r.len()).unwrap_or(0);
        let names = (0..d).map(|j| format!("f{}", j)).collect();
        FeatureMatrix::new(names, rows).unwrap()
    }

    #[test]
    fn test_transformed_columns_are_centered_and_unit_scaled() {
        let m = matrix(vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]]);
        let scaler = StandardScaler::fit(&m).unwrap();
        let scaled = scaler.transform(&m).unwrap();

        for j in 0..2 {
            let col = scaled.column(j);
            let mean: f32 = col.iter().sum::<f32>() / col.len() as f32;
            let var: f32 = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>()
                / col.len() as f32;
            assert!(mean.abs() < 1e-5, "column {} mean {}", j, mean);
            assert!((var.sqrt() - 1.0).abs() < 1e-4, "column {} std {}", j, var.sqrt());
        }
    }

    #[test]
    fn test_constant_column_stays_finite() {
        let m = matrix(vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]]);
        let scaler = StandardScaler::fit(&m).unwrap();
        let scaled = scaler.transform(&m).unwrap();
        for row in &scaled.rows {
            assert!(row.iter().all(|v| v.is_finite()));
        }
        // The constant column centers to exactly zero
        assert!(scaled.column(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mismatched_columns_rejected() {
        let m = matrix(vec![vec![1.0], vec![2.0]]);
        let scaler = StandardScaler::fit(&m).unwrap();
        let other = FeatureMatrix::new(vec!["other".into()], vec![vec![1.0]]).unwrap();
        assert!(scaler.transform(&other).is_err());
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let m = matrix(vec![]);
        assert!(StandardScaler::fit(&m).is_err());
    }

    #[test]
    fn test_same_parameters_apply_to_new_rows() {
        let train = matrix(vec![vec![0.0], vec![10.0]]);
        let scaler = StandardScaler::fit(&train).unwrap();
        // mean 5, std 5 — a held-out value of 15 maps to +2
        let held_out = matrix(vec![vec![15.0]]);
        let scaled = scaler.transform(&held_out).unwrap();
        assert!((scaled.rows[0][0] - 2.0).abs() < 1e-6);
    }
}
