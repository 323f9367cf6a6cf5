// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train-image`     — trains AlexNet on CIFAR-10
//   2. `train-sentiment` — trains the LSTM on labelled tweets
//   3. `classify`        — loads the LSTM and labels one tweet

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, ImageArgs, SentimentArgs};

#[derive(Parser, Debug)]
#[command(
    name = "classic-nets",
    version = "0.1.0",
    about = "Train AlexNet on CIFAR-10 or an LSTM tweet sentiment classifier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::TrainImage(args)     => run_train_image(args),
            Commands::TrainSentiment(args) => run_train_sentiment(args),
            Commands::Classify(args)       => run_classify(args),
        }
    }
}

fn run_train_image(args: ImageArgs) -> Result<()> {
    use crate::application::image_use_case::ImageTrainUseCase;

    tracing::info!("Starting AlexNet training on: {}", args.data_dir);
    let report = ImageTrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete. Validation accuracy: {:.2} %",
        report.valid.accuracy() * 100.0
    );
    Ok(())
}

fn run_train_sentiment(args: SentimentArgs) -> Result<()> {
    use crate::application::sentiment_use_case::SentimentTrainUseCase;

    tracing::info!("Starting sentiment training on: {}", args.train_csv);
    SentimentTrainUseCase::new(args.into()).execute()?;

    println!("Training complete. Checkpoint saved.");
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    use crate::application::classify_use_case::ClassifyUseCase;
    use crate::domain::traits::SentimentClassifier;
    use crate::ml::cpu_device;
    use burn::backend::NdArray;

    let classifier = ClassifyUseCase::<NdArray>::load(&args.checkpoint_dir, cpu_device())?;
    let prediction = classifier.classify(&args.text)?;

    println!(
        "\nSentiment: {} ({:.1} % confidence)",
        prediction.sentiment,
        prediction.confidence * 100.0
    );
    Ok(())
}
