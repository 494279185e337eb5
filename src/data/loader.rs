// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Loads player rows from a CSV file using the csv crate.
//
// The file must have a header row. Columns come in two kinds:
//
//   numeric columns     → every cell parses as f64; these become
//                         the candidate feature / target columns
//   non-numeric columns → player names, team codes, positions;
//                         the first one supplies the record label,
//                         the rest are dropped
//
// Detection is two-pass: read every row first, then mark a column
// numeric only if ALL of its cells parse. A single stray cell
// (including an empty one) disqualifies the whole column, which
// keeps the numeric table dense — no NaN placeholders downstream.
//
// Reference: csv crate documentation
//            Rust Book §8 (Collections)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::player::{PlayerRecord, PlayerTable};
use crate::domain::traits::RecordSource;

/// Loads all rows from a single CSV file.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    /// Path to the CSV file
    path: String,
}

impl CsvLoader {
    /// Create a new CsvLoader pointed at a file
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Implement the RecordSource trait so the application layer
/// can call load_all() without knowing about CSV internals
impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<PlayerTable> {
        let mut reader = csv::ReaderBuilder::new()
            .from_path(Path::new(&self.path))
            .with_context(|| format!("Cannot read CSV '{}'", self.path))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", self.path))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // First pass: pull every row into memory as strings.
        // The csv crate rejects ragged rows for us (flexible is off).
        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record
                .with_context(|| format!("Malformed CSV row {} in '{}'", i + 2, self.path))?;
            raw_rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
        }

        // Second pass: a column is numeric only if all of its cells parse
        let numeric_mask: Vec<bool> = (0..headers.len())
            .map(|j| raw_rows.iter().all(|row| row[j].parse::<f64>().is_ok()))
            .collect();

        let columns: Vec<String> = headers
            .iter()
            .zip(&numeric_mask)
            .filter(|(_, &numeric)| numeric)
            .map(|(name, _)| name.clone())
            .collect();

        for (name, &numeric) in headers.iter().zip(&numeric_mask) {
            if !numeric {
                tracing::debug!("Column '{}' is not numeric — kept out of the feature table", name);
            }
        }

        // The first non-numeric column names the rows (usually the player)
        let label_idx = numeric_mask.iter().position(|&numeric| !numeric);

        let records: Vec<PlayerRecord> = raw_rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let label = match label_idx {
                    Some(j) if !row[j].is_empty() => row[j].clone(),
                    _ => format!("row {}", i + 1),
                };
                let values = row
                    .iter()
                    .zip(&numeric_mask)
                    .filter(|(_, &numeric)| numeric)
                    .map(|(cell, _)| cell.parse::<f64>().unwrap_or_default())
                    .collect();
                PlayerRecord::new(label, values)
            })
            .collect();

        if records.is_empty() {
            tracing::warn!("CSV '{}' has a header but no data rows", self.path);
        }

        tracing::info!(
            "Loaded {} rows with {} numeric columns from '{}'",
            records.len(),
            columns.len(),
            self.path
        );

        Ok(PlayerTable { columns, records })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_numeric_columns_and_labels() {
        let path = write_fixture(
            "loader_basic.csv",
            "player,team,games,points\nA. Adams,BUF,16,15.1\nB. Brown,MIA,12,9.3\n",
        );
        let table = CsvLoader::new(&path).load_all().unwrap();
        assert_eq!(table.columns, vec!["games", "points"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.records[0].label, "A. Adams");
        assert_eq!(table.records[0].values, vec![16.0, 15.1]);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_stray_cell_disqualifies_column() {
        let path = write_fixture(
            "loader_stray.csv",
            "games,points\n16,15.1\nDNP,9.3\n",
        );
        let table = CsvLoader::new(&path).load_all().unwrap();
        // "DNP" makes the games column non-numeric; it becomes the label column
        assert_eq!(table.columns, vec!["points"]);
        assert_eq!(table.records[1].label, "DNP");
        assert_eq!(table.records[1].values, vec![9.3]);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = CsvLoader::new("/definitely/not/here.csv");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_no_label_column_falls_back_to_row_numbers() {
        let path = write_fixture("loader_nolabel.csv", "games,points\n16,15.1\n");
        let table = CsvLoader::new(&path).load_all().unwrap();
        assert_eq!(table.records[0].label, "row 1");
        fs::remove_file(path).ok();
    }
}
