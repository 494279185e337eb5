// ============================================================
// Layer 5 — Regression Metrics
// ============================================================
// Scalar quality measures computed on plain slices, away from
// any tensor backend. Predictions come off the model as Vec<f32>
// and everything here works directly on those.
//
// What's in this module:
//
//   mean_squared_error / root_mean_squared_error / mean_absolute_error
//       — the standard trio, reported for train and test
//
//   r2_score
//       — 1 - ss_res/ss_tot; a constant-target partition has
//         ss_tot == 0, in which case the score is 1.0 for exact
//         predictions and 0.0 otherwise
//
//   correlation_matrix
//       — Pearson correlations between columns, rendered as the
//         heatmap; a zero-variance column yields NaN entries,
//         same as a spreadsheet would
//
//   distribution_overlap
//       — how much of the predicted score distribution sits on
//         top of the actual one, via 30-bin histogram densities;
//         1.0 means the shapes match, 0.0 means no common ground
//
// All sums run in f64 even though inputs are f32 — thirty players
// is nothing, but full league tables deserve stable accumulation.
//
// Reference: Rust Book §13 (Iterators)

/// Number of histogram bins used by the overlap measure
const OVERLAP_BINS: usize = 30;

/// Mean of squared errors. Empty input gives NaN.
pub fn mean_squared_error(actual: &[f32], predicted: &[f32]) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| {
            let d = a as f64 - p as f64;
            d * d
        })
        .sum();
    sum / actual.len() as f64
}

/// Square root of the MSE, in the target's own units.
pub fn root_mean_squared_error(actual: &[f32], predicted: &[f32]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

/// Mean of absolute errors. Empty input gives NaN.
pub fn mean_absolute_error(actual: &[f32], predicted: &[f32]) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| (a as f64 - p as f64).abs())
        .sum();
    sum / actual.len() as f64
}

/// Coefficient of determination: 1 - ss_res / ss_tot.
///
/// 1.0 is a perfect fit, 0.0 is no better than predicting the
/// mean, negative is worse than that. When every actual value is
/// identical (ss_tot == 0) the score degenerates: 1.0 if the
/// predictions are exact, 0.0 otherwise.
pub fn r2_score(actual: &[f32], predicted: &[f32]) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return f64::NAN;
    }

    let mean: f64 = actual.iter().map(|&a| a as f64).sum::<f64>() / actual.len() as f64;

    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| {
            let d = a as f64 - p as f64;
            d * d
        })
        .sum();

    let ss_tot: f64 = actual
        .iter()
        .map(|&a| {
            let d = a as f64 - mean;
            d * d
        })
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

/// Pearson correlation matrix between columns.
///
/// `columns[i]` is one variable's values; all columns must have
/// the same length. The result is symmetric with a unit diagonal
/// (NaN rows for zero-variance columns).
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let n = columns.first().map(|c| c.len()).unwrap_or(0);

    let means: Vec<f64> = columns
        .iter()
        .map(|col| col.iter().sum::<f64>() / n.max(1) as f64)
        .collect();

    let mut matrix = vec![vec![0.0f64; k]; k];
    for i in 0..k {
        for j in i..k {
            let mut cov = 0.0f64;
            let mut var_i = 0.0f64;
            let mut var_j = 0.0f64;
            for r in 0..n {
                let di = columns[i][r] - means[i];
                let dj = columns[j][r] - means[j];
                cov   += di * dj;
                var_i += di * di;
                var_j += dj * dj;
            }
            let denom = (var_i * var_j).sqrt();
            let corr = if denom == 0.0 { f64::NAN } else { cov / denom };
            matrix[i][j] = corr;
            matrix[j][i] = corr;
        }
    }
    matrix
}

/// Histogram densities over `bins` equal-width bins spanning [lo, hi].
///
/// A value lands in bin floor((v - lo) / width), except that v == hi
/// belongs to the last bin; values outside [lo, hi] are ignored.
/// Densities are counts divided by (in-range count × bin width), so
/// they integrate to 1 over the range — unless nothing was in range,
/// in which case every density is 0.
fn histogram_density(values: &[f32], lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    let mut in_range = 0usize;

    for &v in values {
        let v = v as f64;
        if v < lo || v > hi {
            continue;
        }
        let idx = if v >= hi {
            bins - 1
        } else {
            (((v - lo) / width) as usize).min(bins - 1)
        };
        counts[idx] += 1;
        in_range += 1;
    }

    if in_range == 0 {
        return vec![0.0; bins];
    }

    counts
        .iter()
        .map(|&c| c as f64 / (in_range as f64 * width))
        .collect()
}

/// Overlap between the actual and predicted score distributions.
///
/// Both histograms use 30 equal-width bins spanning the ACTUAL
/// values' range (the predicted histogram reuses those edges), and
/// the overlap is the integral of the pointwise minimum density:
///
///   overlap = Σ min(density_actual_i, density_pred_i) · bin_width
///
/// Identical samples give 1.0; predictions entirely outside the
/// actual range give 0.0.
pub fn distribution_overlap(actual: &[f32], predicted: &[f32]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }

    let mut lo = actual.iter().copied().fold(f64::INFINITY, |m, v| m.min(v as f64));
    let mut hi = actual.iter().copied().fold(f64::NEG_INFINITY, |m, v| m.max(v as f64));

    // A single repeated value has zero range — widen it so the
    // bins have nonzero width
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / OVERLAP_BINS as f64;
    let density_actual = histogram_density(actual, lo, hi, OVERLAP_BINS);
    let density_pred   = histogram_density(predicted, lo, hi, OVERLAP_BINS);

    density_actual
        .iter()
        .zip(&density_pred)
        .map(|(&a, &p)| a.min(p) * width)
        .sum()
}
