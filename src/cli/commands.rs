// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `train`, `evaluate`, `extract`
// and `inspect`, with all their configurable flags.
//
// Argument structs convert into application-layer configs via
// From impls, so no clap type crosses into Layer 2.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::{extract_use_case::ExtractOutput, train_use_case::TrainConfig};
use crate::data::window::ExtractConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the seizure classifier on a labelled archive
    Train(TrainArgs),

    /// Score the best checkpoint on a labelled test archive
    Evaluate(EvaluateArgs),

    /// Cut the window around the first seizure sample
    Extract(ExtractArgs),

    /// Print an archive's header and label counts
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Labelled training archive
    #[arg(long, default_value = "data/data.bin")]
    pub data_file: String,

    /// Where the best model, optimizer state and metrics go
    #[arg(long, default_value = "models")]
    pub checkpoint_dir: String,

    /// Warm-start from the best model in this checkpoint directory
    #[arg(long)]
    pub init_from: Option<String>,

    /// Channels per sample
    #[arg(long, default_value_t = 18)]
    pub in_channels: usize,

    /// Time steps per sample
    #[arg(long, default_value_t = 1024)]
    pub time_dim: usize,

    #[arg(long, default_value_t = 128)]
    pub n_filters: usize,

    #[arg(long, default_value_t = 100)]
    pub head_hidden: usize,

    /// Kernel width of the first head convolution
    #[arg(long, default_value_t = 16)]
    pub head_kernel: usize,

    /// Max-pool width and stride of each conv block
    #[arg(long, default_value_t = 4)]
    pub pool: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Upper bound on epochs; early stopping usually ends sooner
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Non-improving epochs tolerated before stopping
    #[arg(long, default_value_t = 5)]
    pub patience: usize,

    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    /// Share of samples used for training; the rest validate
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Seed for the split and the per-epoch shuffles
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_file:      a.data_file,
            checkpoint_dir: a.checkpoint_dir,
            init_from:      a.init_from,
            in_channels:    a.in_channels,
            time_dim:       a.time_dim,
            n_filters:      a.n_filters,
            head_hidden:    a.head_hidden,
            head_kernel:    a.head_kernel,
            pool:           a.pool,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            patience:       a.patience,
            lr:             a.lr,
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Labelled test archive
    #[arg(long, default_value = "data/test.bin")]
    pub data_file: String,

    /// Directory written by `train`
    #[arg(long, default_value = "models")]
    pub checkpoint_dir: String,

    /// Append the raw per-row logits to this file
    #[arg(long)]
    pub outputs_log: Option<String>,
}

/// Output format of `extract`
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ExtractFormat {
    /// C header with one row per time position
    Header,
    /// Binary archive of the whole samples in the window
    Archive,
}

impl From<ExtractFormat> for ExtractOutput {
    fn from(f: ExtractFormat) -> Self {
        match f {
            ExtractFormat::Header  => ExtractOutput::Header,
            ExtractFormat::Archive => ExtractOutput::Archive,
        }
    }
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[arg(long, default_value = "data/data.bin")]
    pub data_file: String,

    #[arg(long, default_value = "eeg_data.h")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = ExtractFormat::Header)]
    pub format: ExtractFormat,

    /// Expected channels per sample
    #[arg(long, default_value_t = 18)]
    pub channel_dim: usize,

    /// Expected time steps per sample
    #[arg(long, default_value_t = 1024)]
    pub time_dim: usize,

    /// Samples to include before the first seizure sample
    #[arg(long, default_value_t = 5)]
    pub pre_roll: usize,

    /// Cap on emitted sub-samples
    #[arg(long, default_value_t = 8192)]
    pub max_sub_samples: usize,
}

impl From<&ExtractArgs> for ExtractConfig {
    fn from(a: &ExtractArgs) -> Self {
        ExtractConfig {
            channel_dim:     a.channel_dim,
            time_dim:        a.time_dim,
            pre_roll:        a.pre_roll,
            max_sub_samples: a.max_sub_samples,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Archive to summarise
    #[arg(long, default_value = "data/data.bin")]
    pub data_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["eeg-seizure", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();
        assert_eq!(cfg.data_file, def.data_file);
        assert_eq!(cfg.patience, def.patience);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert!((cfg.lr - def.lr).abs() < 1e-12);
        assert!(cfg.init_from.is_none());
    }

    #[test]
    fn test_extract_args() {
        let cli = Cli::try_parse_from([
            "eeg-seizure", "extract", "--format", "archive", "--pre-roll", "2", "--output", "w.bin",
        ])
        .unwrap();
        let Commands::Extract(args) = cli.command else { panic!("expected extract") };
        assert!(matches!(ExtractOutput::from(args.format), ExtractOutput::Archive));
        let cfg = ExtractConfig::from(&args);
        assert_eq!(cfg.pre_roll, 2);
        assert_eq!(cfg.max_sub_samples, 8192);
        assert_eq!(args.output, PathBuf::from("w.bin"));
    }
}
