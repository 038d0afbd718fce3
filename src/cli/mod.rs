// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands each subcommand to its Layer 2 use case.
//
//   1. `train`    — fit the classifier with early stopping
//   2. `evaluate` — score the best checkpoint on a test archive
//   3. `extract`  — window around the first seizure sample
//   4. `inspect`  — summarise an archive

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, ExtractArgs, InspectArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "eeg-seizure",
    version = "0.1.0",
    about = "Train and evaluate a 1-D conv seizure detector on EEG archives, and extract firmware test data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case. Nothing is computed here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Extract(args)  => run_extract(args),
            Commands::Inspect(args)  => run_inspect(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.data_file);
    TrainUseCase::new(args.into()).execute()?;
    println!("Training complete.");
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    EvaluateUseCase::new(args.checkpoint_dir, args.data_file, args.outputs_log).execute()?;
    Ok(())
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    use crate::application::extract_use_case::ExtractUseCase;

    let config = (&args).into();
    let written = ExtractUseCase::new(args.data_file, args.output.clone(), args.format.into(), config)
        .execute()?;
    println!("Wrote {} entries to {}", written, args.output.display());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    InspectUseCase::new(args.data_file).execute()
}
