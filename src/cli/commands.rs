// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `evaluate`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the points regressor on a player-stats CSV
    Train(TrainArgs),

    /// Evaluate the best checkpoint: metrics, plots, feature importances
    Evaluate(EvaluateArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with one row per player season
    #[arg(long, default_value = "data/player_stats.csv")]
    pub data_csv: String,

    /// Directory to save the best checkpoint, config and scaler
    #[arg(long, default_value = "models")]
    pub checkpoint_dir: String,

    /// Column holding the regression target
    #[arg(long, default_value = "fantasy_points_per_game")]
    pub target_col: String,

    /// Feature columns, comma separated.
    /// Empty means: every numeric column except the target, in header order.
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 1000)]
    pub epochs: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Width of the hidden layers
    #[arg(long, default_value_t = 64)]
    pub hidden_dim: usize,

    /// Dropout probability — randomly zeroes activations during training
    /// to prevent overfitting
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Targets strictly above this get the high loss weight
    #[arg(long, default_value_t = 14.5)]
    pub high_threshold: f64,

    /// Targets strictly below this get the very-low-region loss weight
    #[arg(long, default_value_t = 4.0)]
    pub low_threshold: f64,

    /// Loss weight for the high-scoring region
    #[arg(long, default_value_t = 6.0)]
    pub high_weight: f64,

    /// Loss weight for the middle region (including both thresholds)
    #[arg(long, default_value_t = 1.0)]
    pub low_weight: f64,

    /// Loss weight for the very-low-scoring region
    #[arg(long, default_value_t = 3.0)]
    pub very_low_weight: f64,

    /// Fraction of all rows held out as the test partition
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Fraction of the remaining rows held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Seed for the split shuffle (and batch shuffling)
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_csv:        a.data_csv,
            checkpoint_dir:  a.checkpoint_dir,
            target_col:      a.target_col,
            features:        if a.features.is_empty() { None } else { Some(a.features) },
            batch_size:      a.batch_size,
            epochs:          a.epochs,
            lr:              a.lr,
            hidden_dim:      a.hidden_dim,
            dropout:         a.dropout,
            high_threshold:  a.high_threshold,
            low_threshold:   a.low_threshold,
            high_weight:     a.high_weight,
            low_weight:      a.low_weight,
            very_low_weight: a.very_low_weight,
            test_fraction:   a.test_fraction,
            val_fraction:    a.val_fraction,
            seed:            a.seed,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory where the checkpoint, config and scaler were saved
    #[arg(long, default_value = "models")]
    pub checkpoint_dir: String,

    /// Directory to write the diagnostic PNGs into
    #[arg(long, default_value = "results")]
    pub results_dir: String,

    /// Override the CSV recorded in the training config
    #[arg(long)]
    pub data_csv: Option<String>,
}
