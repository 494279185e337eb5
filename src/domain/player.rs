// ============================================================
// Layer 3 — Player Domain Types
// ============================================================
// Represents a single player's season row loaded from the CSV,
// and the table of all rows together with the numeric column
// names they share. Plain data structs with almost no behaviour.
//
// Using #[derive(Debug, Clone)] gives us:
//   - Debug: lets us print the struct with {:?}
//   - Clone: lets us make copies of the struct
//   - Serialize/Deserialize: lets us save/load as JSON
//
// Reference: Rust Book §5 (Structs and Methods)
//            Rust Book §10 (Derive Macros)

use serde::{Deserialize, Serialize};

/// One player's season row.
/// By the time a PlayerRecord is created, the raw CSV strings
/// have already been parsed — only numeric values survive here,
/// aligned with the owning table's column list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// The player name (or "row N" when the CSV has no name column) —
    /// kept for traceability so diagnostics can point back to a row
    pub label: String,

    /// Numeric cell values, one per numeric column of the table,
    /// in the table's column order
    pub values: Vec<f64>,
}

impl PlayerRecord {
    /// Create a new PlayerRecord with a label and its numeric values.
    /// Uses impl Into<String> so callers can pass &str or String —
    /// this is idiomatic Rust for flexible string arguments.
    ///
    /// Example:
    ///   let row = PlayerRecord::new("J. Jefferson", vec![17.0, 128.0]);
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// All loaded rows plus the numeric column names they share.
/// Invariant: every record's `values` has exactly one entry per
/// column in `columns`, in the same order.
#[derive(Debug, Clone)]
pub struct PlayerTable {
    /// Names of the numeric columns, in CSV header order
    pub columns: Vec<String>,

    /// One record per CSV data row
    pub records: Vec<PlayerRecord>,
}

impl PlayerTable {
    /// Number of data rows in the table
    pub fn n_rows(&self) -> usize {
        self.records.len()
    }

    /// Index of a numeric column by name, or None if absent
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
