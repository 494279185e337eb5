// ============================================================
// Layer 4 — Train/Validation/Test Splitter
// ============================================================
// Shuffles samples with a seeded RNG and splits them into sets:
//   - Training set:   used to update model weights
//   - Validation set: used to pick the best checkpoint
//   - Test set:       used only for the final evaluation
//
// Why do we need hold-out sets?
//   If we only train and test on the same data, the model
//   could memorise the answers without actually learning.
//   The hold-out sets tell us if the model generalises
//   to rows it has never seen before.
//
// Why shuffle before splitting?
//   CSV exports are often ordered (e.g. by team, or by total
//   points). Without shuffling, the test set would only contain
//   one slice of the league. Shuffling gives every set a
//   representative mix.
//
// Why a SEEDED rng instead of thread_rng?
//   Evaluation runs in a separate process from training. It
//   re-runs this exact split from the persisted seed so that
//   the test rows it scores are the ones training never saw.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom
// which is the standard unbiased shuffle algorithm.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shuffle `samples` with the given RNG and split into (first, second).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `first_fraction` - Proportion for the first set, e.g. 0.8 = 80%
///
/// # Returns
/// A tuple (first_samples, second_samples)
pub fn split_with_rng<T, R: Rng>(
    mut samples:    Vec<T>,
    first_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    // Fisher-Yates shuffle — every permutation is equally likely
    samples.shuffle(rng);

    // Calculate the split index
    // e.g. 100 samples * 0.8 = 80 → first 80 stay
    let total    = samples.len();
    let split_at = ((total as f64) * first_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let second = samples.split_off(split_at);

    (samples, second)
}

/// The full three-way split used by both the train and evaluate passes.
///
/// First carves off `test_fraction` of all rows, then takes
/// `val_fraction` of the remainder for validation. Both passes call
/// this with the same seed and fractions, so the partitions match.
pub fn three_way_split<T>(
    samples:       Vec<T>,
    test_fraction: f64,
    val_fraction:  f64,
    seed:          u64,
) -> (Vec<T>, Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let (rest, test) = split_with_rng(samples, 1.0 - test_fraction, &mut rng);
    let (train, val) = split_with_rng(rest, 1.0 - val_fraction, &mut rng);

    tracing::debug!(
        "Dataset split: {} training, {} validation, {} test",
        train.len(),
        val.len(),
        test.len(),
    );

    (train, val, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let (first, second) = split_with_rng(items, 0.8, &mut rng);
        assert_eq!(first.len(),  80);
        assert_eq!(second.len(), 20);
    }

    #[test]
    fn test_all_items_preserved() {
        // No items should be lost in the split
        let items: Vec<usize> = (0..50).collect();
        let (train, val, test) = three_way_split(items, 0.2, 0.2, 7);
        let mut all: Vec<usize> = train.into_iter().chain(val).chain(test).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val, test) = three_way_split(items, 0.2, 0.2, 7);
        assert!(train.is_empty());
        assert!(val.is_empty());
        assert!(test.is_empty());
    }

    #[test]
    fn test_three_way_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val, test) = three_way_split(items, 0.2, 0.2, 7);
        assert_eq!(test.len(),  20);
        assert_eq!(val.len(),   16);
        assert_eq!(train.len(), 64);
    }

    #[test]
    fn test_same_seed_reproduces_partitions() {
        let items: Vec<usize> = (0..40).collect();
        let a = three_way_split(items.clone(), 0.25, 0.25, 99);
        let b = three_way_split(items, 0.25, 0.25, 99);
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
        assert_eq!(a.2, b.2);
    }
}
