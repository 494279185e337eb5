// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw CSV file
// all the way to backend-ready tensor batches.
//
// The pipeline flows in this order:
//
//   player_stats.csv
//       │
//       ▼
//   CsvLoader          → reads rows, detects numeric columns
//       │
//       ▼
//   FeatureMatrix      → selects feature columns + target (Layer 3)
//       │
//       ▼
//   three_way_split    → seeded train / validation / test partitions
//       │
//       ▼
//   StandardScaler     → z-scores features (fit on train only)
//       │
//       ▼
//   RegressionDataset  → implements Burn's Dataset trait
//       │
//       ▼
//   RegressionBatcher  → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader         → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads player rows from a CSV file using the csv crate
pub mod loader;

/// Standardizes feature columns (z-score, fit on train only)
pub mod preprocessor;

/// Implements Burn's Dataset trait for regression samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation/test sets
pub mod splitter;
