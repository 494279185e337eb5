// ============================================================
// Layer 3 — Feature Matrix Domain Type
// ============================================================
// Represents the model input in domain terms:
//   - a 2-D matrix, one row per player, one column per feature
//   - an ordered list of feature names, aligned with the columns
//   - a target value per row, carried separately
//
// The column order is load-bearing. The scaler, the model and the
// permutation-importance pass all address features by position, so
// `feature_names[j]` must describe column j everywhere. Every
// constructor on this type checks that alignment.
//
// Reference: Rust Book §5 (Structs)

use anyhow::{bail, Result};

use crate::domain::player::PlayerTable;

/// A rows × features matrix with named columns.
///
/// Values are f32 because that is what the tensor backend consumes;
/// the raw CSV values are f64 and are narrowed exactly once, here.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// Column names, one per feature, in column order
    pub feature_names: Vec<String>,

    /// Row-major values; every inner Vec has `feature_names.len()` entries
    pub rows: Vec<Vec<f32>>,
}

impl FeatureMatrix {
    /// Build a matrix from parts, checking the alignment invariant.
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<f32>>) -> Result<Self> {
        let width = feature_names.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                bail!(
                    "row {} has {} values but there are {} feature columns",
                    i,
                    row.len(),
                    width
                );
            }
        }
        Ok(Self { feature_names, rows })
    }

    /// Select feature columns and the target column out of a loaded table.
    ///
    /// `explicit` pins the feature set (and its order); `None` means every
    /// numeric column except the target, in header order. Returns the
    /// matrix together with the target vector, row-aligned.
    pub fn from_table(
        table:      &PlayerTable,
        target_col: &str,
        explicit:   Option<&[String]>,
    ) -> Result<(Self, Vec<f32>)> {
        let target_idx = match table.column_index(target_col) {
            Some(idx) => idx,
            None => bail!(
                "target column '{}' is not a numeric column of the CSV (numeric columns: {})",
                target_col,
                table.columns.join(", ")
            ),
        };

        let feature_indices: Vec<usize> = match explicit {
            Some(names) => {
                let mut indices = Vec::with_capacity(names.len());
                for name in names {
                    match table.column_index(name) {
                        Some(idx) if idx != target_idx => indices.push(idx),
                        Some(_) => bail!("feature column '{}' is the target column", name),
                        None => bail!(
                            "feature column '{}' is not a numeric column of the CSV",
                            name
                        ),
                    }
                }
                indices
            }
            None => (0..table.columns.len()).filter(|&i| i != target_idx).collect(),
        };

        if feature_indices.is_empty() {
            bail!("no feature columns left after excluding the target");
        }

        let feature_names: Vec<String> = feature_indices
            .iter()
            .map(|&i| table.columns[i].clone())
            .collect();

        let mut rows = Vec::with_capacity(table.n_rows());
        let mut targets = Vec::with_capacity(table.n_rows());
        for record in &table.records {
            rows.push(feature_indices.iter().map(|&i| record.values[i] as f32).collect());
            targets.push(record.values[target_idx] as f32);
        }

        Ok((Self { feature_names, rows }, targets))
    }

    /// Number of rows (players)
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Copy out column j
    pub fn column(&self, j: usize) -> Vec<f32> {
        self.rows.iter().map(|row| row[j]).collect()
    }

    /// Overwrite column j with the given values (must be row-aligned)
    pub fn set_column(&mut self, j: usize, values: &[f32]) {
        for (row, &v) in self.rows.iter_mut().zip(values) {
            row[j] = v;
        }
    }

    /// Flatten to row-major order for tensor construction
    pub fn to_flat(&self) -> Vec<f32> {
        self.rows.iter().flatten().copied().collect()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::PlayerRecord;

    fn sample_table() -> PlayerTable {
        PlayerTable {
            columns: vec!["games".into(), "yards".into(), "points".into()],
            records: vec![
                PlayerRecord::new("a", vec![16.0, 1200.0, 15.1]),
                PlayerRecord::new("b", vec![12.0, 800.0, 9.3]),
            ],
        }
    }

    #[test]
    fn test_auto_selection_excludes_target_keeps_order() {
        let table = sample_table();
        let (matrix, targets) = FeatureMatrix::from_table(&table, "points", None).unwrap();
        assert_eq!(matrix.feature_names, vec!["games", "yards"]);
        assert_eq!(matrix.rows, vec![vec![16.0, 1200.0], vec![12.0, 800.0]]);
        assert_eq!(targets, vec![15.1, 9.3]);
    }

    #[test]
    fn test_explicit_selection_respects_given_order() {
        let table = sample_table();
        let wanted = vec!["yards".to_string(), "games".to_string()];
        let (matrix, _) = FeatureMatrix::from_table(&table, "points", Some(&wanted)).unwrap();
        assert_eq!(matrix.feature_names, vec!["yards", "games"]);
        assert_eq!(matrix.rows[0], vec![1200.0, 16.0]);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let table = sample_table();
        assert!(FeatureMatrix::from_table(&table, "tds", None).is_err());
    }

    #[test]
    fn test_target_as_feature_is_an_error() {
        let table = sample_table();
        let wanted = vec!["points".to_string()];
        assert!(FeatureMatrix::from_table(&table, "points", Some(&wanted)).is_err());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let bad = FeatureMatrix::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 2.0], vec![3.0]],
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_column_roundtrip() {
        let mut matrix = FeatureMatrix::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .unwrap();
        assert_eq!(matrix.column(1), vec![2.0, 4.0]);
        matrix.set_column(1, &[9.0, 8.0]);
        assert_eq!(matrix.rows, vec![vec![1.0, 9.0], vec![3.0, 8.0]]);
    }
}
