// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and all their flags:
//   train-image     — AlexNet on CIFAR-10 binary batches
//   train-sentiment — LSTM on a labelled tweet CSV
//   classify        — score one tweet with a trained LSTM
//
// Defaults here mirror the application configs so that
// `--help` shows the values a run will actually use.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    image_use_case::ImageTrainConfig,
    sentiment_use_case::SentimentTrainConfig,
};
use crate::ml::BackendKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train AlexNet on the CIFAR-10 binary batches
    TrainImage(ImageArgs),

    /// Train the LSTM sentiment classifier on a tweet CSV
    TrainSentiment(SentimentArgs),

    /// Classify a tweet using a trained sentiment checkpoint
    Classify(ClassifyArgs),
}

/// Tensor backend selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum BackendArg {
    /// CPU through ndarray
    Ndarray,
    /// GPU through WebGPU
    #[default]
    Wgpu,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Ndarray => BackendKind::Ndarray,
            BackendArg::Wgpu    => BackendKind::Wgpu,
        }
    }
}

/// All arguments for the `train-image` command.
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Directory with data_batch_1.bin … data_batch_5.bin and test_batch.bin
    #[arg(long, default_value = "data/cifar-10-batches-bin")]
    pub data_dir: String,

    /// Directory to save model checkpoints and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 2)]
    pub epochs: usize,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 0.005)]
    pub lr: f64,

    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    #[arg(long, default_value_t = 0.005)]
    pub weight_decay: f64,

    /// Side length images are resized to before the first convolution
    #[arg(long, default_value_t = 227)]
    pub image_size: usize,

    /// Output channels of the five convolutions, comma separated
    #[arg(long, value_delimiter = ',', default_value = "96,256,384,384,256")]
    pub conv_channels: Vec<usize>,

    /// Width of the two hidden fully connected layers
    #[arg(long, default_value_t = 4096)]
    pub hidden_units: usize,

    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Share of the training batches held out for validation
    #[arg(long, default_value_t = 0.1)]
    pub valid_fraction: f64,

    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Random crop and horizontal flip on training images
    #[arg(long)]
    pub augment: bool,

    /// Data loader worker threads
    #[arg(long, default_value_t = 2)]
    pub num_workers: usize,

    #[arg(long, value_enum, default_value_t = BackendArg::Wgpu)]
    pub backend: BackendArg,
}

impl From<ImageArgs> for ImageTrainConfig {
    fn from(a: ImageArgs) -> Self {
        ImageTrainConfig {
            data_dir:       a.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            learning_rate:  a.lr,
            momentum:       a.momentum,
            weight_decay:   a.weight_decay,
            image_size:     a.image_size,
            conv_channels:  a.conv_channels,
            hidden_units:   a.hidden_units,
            dropout:        a.dropout,
            valid_fraction: a.valid_fraction,
            seed:           a.seed,
            augment:        a.augment,
            num_workers:    a.num_workers,
            backend:        a.backend.into(),
        }
    }
}

/// All arguments for the `train-sentiment` command.
#[derive(Args, Debug)]
pub struct SentimentArgs {
    /// CSV with `Category` (label) and `Tweet` (text) columns
    #[arg(long, default_value = "data/train.csv")]
    pub train_csv: String,

    /// Optional CSV whose tweets only contribute vocabulary
    #[arg(long)]
    pub unlabeled_csv: Option<String>,

    /// Text column of the unlabelled CSV
    #[arg(long, default_value = "Category")]
    pub unlabeled_text_column: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Every tweet is padded or truncated to this many tokens
    #[arg(long, default_value_t = 32)]
    pub seq_length: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    #[arg(long, default_value_t = 3e-4)]
    pub lr: f64,

    #[arg(long, default_value_t = 64)]
    pub embedding_dim: usize,

    #[arg(long, default_value_t = 32)]
    pub hidden_dim: usize,

    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    #[arg(long, default_value_t = 0.15)]
    pub valid_fraction: f64,

    /// Keep the corpus as is instead of undersampling to the smallest class
    #[arg(long)]
    pub no_balance: bool,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,

    #[arg(long, value_enum, default_value_t = BackendArg::Wgpu)]
    pub backend: BackendArg,
}

impl From<SentimentArgs> for SentimentTrainConfig {
    fn from(a: SentimentArgs) -> Self {
        SentimentTrainConfig {
            train_csv:             a.train_csv,
            unlabeled_csv:         a.unlabeled_csv,
            unlabeled_text_column: a.unlabeled_text_column,
            checkpoint_dir:        a.checkpoint_dir,
            seq_length:            a.seq_length,
            batch_size:            a.batch_size,
            epochs:                a.epochs,
            learning_rate:         a.lr,
            embedding_dim:         a.embedding_dim,
            hidden_dim:            a.hidden_dim,
            dropout:               a.dropout,
            valid_fraction:        a.valid_fraction,
            balance_classes:       !a.no_balance,
            seed:                  a.seed,
            num_workers:           a.num_workers,
            backend:               a.backend.into(),
        }
    }
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The tweet to classify
    #[arg(long)]
    pub text: String,

    /// Directory where the sentiment checkpoints were saved
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_image_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["classic-nets", "train-image"]).unwrap();
        let Commands::TrainImage(args) = cli.command else { panic!("wrong subcommand") };
        let cfg: ImageTrainConfig = args.into();
        let default = ImageTrainConfig::default();
        assert_eq!(cfg.epochs, default.epochs);
        assert_eq!(cfg.conv_channels, default.conv_channels);
        assert_eq!(cfg.learning_rate, default.learning_rate);
        assert_eq!(cfg.backend, BackendKind::Wgpu);
    }

    #[test]
    fn test_sentiment_flags() {
        let cli = Cli::try_parse_from([
            "classic-nets", "train-sentiment",
            "--unlabeled-csv", "test.csv",
            "--no-balance",
            "--backend", "ndarray",
        ])
        .unwrap();
        let Commands::TrainSentiment(args) = cli.command else { panic!("wrong subcommand") };
        let cfg: SentimentTrainConfig = args.into();
        assert_eq!(cfg.unlabeled_csv.as_deref(), Some("test.csv"));
        assert!(!cfg.balance_classes);
        assert_eq!(cfg.backend, BackendKind::Ndarray);
        assert_eq!(cfg.seq_length, 32);
    }

    #[test]
    fn test_custom_conv_channels() {
        let cli = Cli::try_parse_from([
            "classic-nets", "train-image", "--conv-channels", "8,16,16,16,8",
        ])
        .unwrap();
        let Commands::TrainImage(args) = cli.command else { panic!("wrong subcommand") };
        assert_eq!(args.conv_channels, vec![8, 16, 16, 16, 8]);
    }

    #[test]
    fn test_classify_requires_text() {
        assert!(Cli::try_parse_from(["classic-nets", "classify"]).is_err());
    }
}
