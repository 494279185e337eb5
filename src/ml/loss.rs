// ============================================================
// Layer 5 — Region-Weighted MSE Loss
// ============================================================
// Plain MSE treats a 2-point miss on a bench player the same as
// a 2-point miss on a league winner. For fantasy purposes the
// tails are what matter: the model must not flatten the stars
// down toward the league average, and it should stay honest
// about the near-zero crowd. So the squared error is weighted
// by which scoring region the TARGET falls in:
//
//   target > high_threshold → high_weight      (the stars)
//   target < low_threshold  → very_low_weight  (the bench)
//   otherwise               → low_weight       (the middle)
//
// Both comparisons are strict, so a target sitting exactly on
// either threshold belongs to the middle region. That convention
// is relied on elsewhere; keep it.
//
// With all three weights at 1.0 this reduces to plain MSE.
//
// Reference: Burn Book §3 (Tensor operations)

use burn::prelude::*;

/// Mean squared error with per-element weights chosen by the
/// scoring region of the target.
///
/// Built by the caller and handed to the training loop, so the
/// loop itself never knows how the loss is shaped.
#[derive(Debug, Clone)]
pub struct WeightedMseLoss {
    /// Targets strictly above this are in the high-scoring region
    pub high_threshold: f64,

    /// Targets strictly below this are in the very-low region
    pub low_threshold: f64,

    /// Weight for the high-scoring region
    pub high_weight: f64,

    /// Weight for the middle region (both thresholds included)
    pub low_weight: f64,

    /// Weight for the very-low region
    pub very_low_weight: f64,
}

impl WeightedMseLoss {
    /// Create a criterion with explicit thresholds and weights.
    /// Parameter order mirrors the construction sites: thresholds
    /// first (high, low), then weights (high, low, very low).
    pub fn new(
        high_threshold:  f64,
        low_threshold:   f64,
        high_weight:     f64,
        low_weight:      f64,
        very_low_weight: f64,
    ) -> Self {
        Self {
            high_threshold,
            low_threshold,
            high_weight,
            low_weight,
            very_low_weight,
        }
    }

    /// Weighted mean over all elements of weight * (prediction - target)².
    ///
    /// predictions, targets: [batch, 1] → loss: [1]
    pub fn forward<B: Backend>(
        &self,
        predictions: Tensor<B, 2>,
        targets:     Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        // Start everything in the middle region, then overwrite the
        // two tails. The tail masks cannot overlap because
        // low_threshold < high_threshold.
        let weights = targets
            .ones_like()
            .mul_scalar(self.low_weight)
            .mask_fill(targets.clone().lower_elem(self.low_threshold), self.very_low_weight)
            .mask_fill(targets.clone().greater_elem(self.high_threshold), self.high_weight);

        let diff = predictions - targets;
        let squared = diff.clone() * diff;

        (weights * squared).mean()
    }
}

/// The standard scoring regions: stars above 14.5 points per game,
/// bench players below 4.0, everyone else weighted 1.
impl Default for WeightedMseLoss {
    fn default() -> Self {
        Self::new(14.5, 4.0, 6.0, 1.0, 3.0)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn column<const N: usize>(values: [f32; N]) -> Tensor<TestBackend, 2> {
        let device = Default::default();
        Tensor::<TestBackend, 1>::from_floats(values.as_slice(), &device).reshape([N, 1])
    }

    #[test]
    fn test_region_weights_applied_to_squared_error() {
        let criterion = WeightedMseLoss::default();
        let predictions = column([0.0, 0.0, 0.0]);
        let targets     = column([20.0, 10.0, 2.0]);

        // 6*400 + 1*100 + 3*4 = 2512; mean = 837.333...
        let loss: f32 = criterion.forward(predictions, targets).into_scalar();
        assert!((loss - 2512.0 / 3.0).abs() < 1e-2, "loss = {}", loss);
    }

    #[test]
    fn test_both_thresholds_fall_in_the_middle_region() {
        let criterion = WeightedMseLoss::default();
        let predictions = column([0.0, 0.0]);
        let targets     = column([14.5, 4.0]);

        // Strict comparisons: both rows get weight 1
        // 1*14.5² + 1*4² = 226.25; mean = 113.125
        let loss: f32 = criterion.forward(predictions, targets).into_scalar();
        assert!((loss - 113.125).abs() < 1e-3, "loss = {}", loss);
    }

    #[test]
    fn test_unit_weights_reduce_to_plain_mse() {
        let criterion = WeightedMseLoss::new(14.5, 4.0, 1.0, 1.0, 1.0);
        let predictions = column([1.0, 2.0, 3.0]);
        let targets     = column([2.0, 2.0, 5.0]);

        // (1 + 0 + 4) / 3
        let loss: f32 = criterion.forward(predictions, targets).into_scalar();
        assert!((loss - 5.0 / 3.0).abs() < 1e-5, "loss = {}", loss);
    }

    #[test]
    fn test_default_region_parameters() {
        let criterion = WeightedMseLoss::default();
        assert_eq!(criterion.high_threshold, 14.5);
        assert_eq!(criterion.low_threshold, 4.0);
        assert_eq!(criterion.high_weight, 6.0);
        assert_eq!(criterion.low_weight, 1.0);
        assert_eq!(criterion.very_low_weight, 3.0);
    }
}
