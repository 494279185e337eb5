// ============================================================
// Layer 5 — Permutation Feature Importance
// ============================================================
// How much does each feature actually matter to the trained
// model? Shuffle one column at a time — breaking its relationship
// with the target while keeping its marginal distribution — and
// watch how much the score degrades:
//
//   importance_j = score(column j shuffled) - score(baseline)
//
// With an error metric like MSE, bigger is more important; a
// feature the model ignores scores the same shuffled or not, so
// its importance is 0. Slightly negative values happen by chance
// and mean "noise", not "harmful".
//
// Columns are perturbed one at a time on an internal copy: the
// caller's matrix is byte-identical after the call, and column j
// is restored before column j+1 is shuffled.
//
// Reference: Breiman (2001) Random Forests, §10
//            Fisher et al. (2019) "All Models are Wrong..."

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::features::FeatureMatrix;
use crate::domain::traits::PointsPredictor;

/// Permutation importance of every feature column, ordered like
/// the input columns.
///
/// `metric` maps (targets, predictions) to a score — the caller
/// chooses it, and the evaluation pass uses mean squared error.
/// `rng` drives the shuffles; seed it for reproducible runs.
pub fn permutation_importance<P, M, R>(
    predictor: &P,
    features:  &FeatureMatrix,
    targets:   &[f32],
    metric:    M,
    rng:       &mut R,
) -> Result<Vec<f64>>
where
    P: PointsPredictor + ?Sized,
    M: Fn(&[f32], &[f32]) -> f64,
    R: Rng,
{
    let baseline_predictions = predictor.predict_batch(features)?;
    let baseline_score = metric(targets, &baseline_predictions);
    tracing::debug!("Permutation baseline score: {:.6}", baseline_score);

    // Work on a copy so the caller's matrix is never touched
    let mut perturbed = features.clone();
    let mut importances = Vec::with_capacity(features.n_features());

    for j in 0..features.n_features() {
        let original = perturbed.column(j);

        let mut shuffled = original.clone();
        shuffled.shuffle(rng);
        perturbed.set_column(j, &shuffled);

        let predictions = predictor.predict_batch(&perturbed)?;
        let score = metric(targets, &predictions);
        importances.push(score - baseline_score);

        // Put the column back before the next one is shuffled
        perturbed.set_column(j, &original);
    }

    Ok(importances)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::metrics::mean_squared_error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 20 rows, 2 columns; column 0 carries the signal, column 1 is noise
    fn fixture() -> (FeatureMatrix, Vec<f32>) {
        let rows: Vec<Vec<f32>> = (0..20)
            .map(|i| vec![i as f32, (i * 7 % 5) as f32])
            .collect();
        let targets: Vec<f32> = rows.iter().map(|r| r[0]).collect();
        let matrix = FeatureMatrix::new(vec!["signal".into(), "noise".into()], rows).unwrap();
        (matrix, targets)
    }

    /// A model that reads only column 0
    fn first_column_model(m: &FeatureMatrix) -> Result<Vec<f32>> {
        Ok(m.rows.iter().map(|row| row[0]).collect())
    }

    #[test]
    fn test_callers_matrix_is_untouched() {
        let (matrix, targets) = fixture();
        let before = matrix.clone();
        let mut rng = StdRng::seed_from_u64(3);

        permutation_importance(
            &first_column_model,
            &matrix,
            &targets,
            mean_squared_error,
            &mut rng,
        )
        .unwrap();

        assert_eq!(matrix, before);
    }

    #[test]
    fn test_ignored_feature_has_exactly_zero_importance() {
        let (matrix, targets) = fixture();
        let mut rng = StdRng::seed_from_u64(3);

        let importances = permutation_importance(
            &first_column_model,
            &matrix,
            &targets,
            mean_squared_error,
            &mut rng,
        )
        .unwrap();

        // Shuffling a column the model never reads changes nothing
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_informative_feature_has_positive_importance() {
        let (matrix, targets) = fixture();
        let mut rng = StdRng::seed_from_u64(3);

        let importances = permutation_importance(
            &first_column_model,
            &matrix,
            &targets,
            mean_squared_error,
            &mut rng,
        )
        .unwrap();

        // Baseline error is 0; any non-identity shuffle of 20
        // distinct values makes it positive
        assert!(importances[0] > 0.0, "importances = {:?}", importances);
    }

    #[test]
    fn test_one_importance_per_column_in_order() {
        let (matrix, targets) = fixture();
        let mut rng = StdRng::seed_from_u64(3);

        let importances = permutation_importance(
            &first_column_model,
            &matrix,
            &targets,
            mean_squared_error,
            &mut rng,
        )
        .unwrap();

        assert_eq!(importances.len(), matrix.n_features());
    }
}
