// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - CsvLoader implements RecordSource
//   - A future ParquetLoader could also implement RecordSource
//   - The application layer only sees RecordSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use crate::domain::features::FeatureMatrix;
use crate::domain::player::PlayerTable;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load player rows from a source.
///
/// Implementations:
///   - CsvLoader → loads from a CSV file with a header row
///   - (future) ParquetLoader → loads from columnar files
pub trait RecordSource {
    /// Load every available row from this source.
    /// Returns the table of records or an error.
    fn load_all(&self) -> Result<PlayerTable>;
}

// ─── PointsPredictor ──────────────────────────────────────────────────────────
/// Any component that can score a feature matrix, one prediction per row.
///
/// Implementations:
///   - Predictor → runs the trained network
///   - any closure Fn(&FeatureMatrix) -> Result<Vec<f32>> — handy in tests
///     and for the permutation-importance pass, which only needs "something
///     that predicts" and never cares what is behind it
pub trait PointsPredictor {
    /// Predict one score per matrix row, in row order.
    fn predict_batch(&self, features: &FeatureMatrix) -> Result<Vec<f32>>;
}

/// Every prediction closure is automatically a PointsPredictor.
impl<F> PointsPredictor for F
where
    F: Fn(&FeatureMatrix) -> Result<Vec<f32>>,
{
    fn predict_batch(&self, features: &FeatureMatrix) -> Result<Vec<f32>> {
        self(features)
    }
}
