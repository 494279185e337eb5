// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — fits the regressor on a player-stats CSV
//   2. `evaluate` — loads the best checkpoint and reports diagnostics
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, EvaluateArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "fantasy-points",
    version = "0.1.0",
    about = "Train an MLP regressor on player season stats, then evaluate it with diagnostics."
)]
pub struct Cli {
    /// The subcommand to run (train or evaluate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => Self::run_train(args),
            Commands::Evaluate(args) => Self::run_evaluate(args),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on data in: {}", args.data_csv);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `evaluate` subcommand.
    /// Loads the best checkpoint and prints metrics, plots and importances.
    fn run_evaluate(args: EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;

        // Build the use case with checkpoint and results directory paths
        let use_case = EvaluateUseCase::new(
            args.checkpoint_dir.clone(),
            args.results_dir.clone(),
            args.data_csv.clone(),
        )?;

        // Run the full diagnostic pass and print a closing line
        use_case.execute()?;

        println!("\nEvaluation complete. Plots saved to {}.", args.results_dir);
        Ok(())
    }
}
