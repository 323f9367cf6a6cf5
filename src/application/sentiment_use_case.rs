// ============================================================
// Layer 2 — SentimentTrainUseCase
// ============================================================
// Orchestrates the LSTM / tweet pipeline in order:
//
//   Step 1: Load labelled tweets                 (Layer 4 - data)
//   Step 2: Undersample to balanced classes      (Layer 4 - data)
//   Step 3: Seeded train/validation split        (Layer 4 - data)
//   Step 4: Clean + tokenise every tweet         (Layer 4 - data)
//   Step 5: Build vocabulary, encode and pad     (Layer 4 - data)
//   Step 6: Save config and vocabulary           (Layer 6 - infra)
//   Step 7: Train with Adam                      (Layer 5 - ml)

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::AdamConfig,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::data::{
    balance::undersample,
    batcher::SentimentBatcher,
    dataset::{EncodedTweet, SentimentDataset},
    preprocessor::TweetPreprocessor,
    splitter::split_train_val,
    tweets::TweetCsvLoader,
    vocab::{Vocabulary, MIN_SEQ_LENGTH},
};
use crate::domain::{sentiment::Sentiment, traits::RecordSource};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    cpu_device, gpu_device,
    lstm::SentimentLstmConfig,
    trainer::{evaluate, fit, Evaluation, FitOptions},
    BackendKind, CpuBackend, GpuBackend,
};

/// File name prefix for everything this pipeline writes.
pub const SENTIMENT_PREFIX: &str = "sentiment_lstm";
pub const CONFIG_FILE: &str = "config.json";
pub const VOCAB_FILE: &str = "vocab.json";

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentTrainConfig {
    pub train_csv:             String,
    /// Extra tweets whose words join the vocabulary (no labels needed)
    pub unlabeled_csv:         Option<String>,
    pub unlabeled_text_column: String,
    pub checkpoint_dir:        String,
    pub seq_length:            usize,
    pub batch_size:            usize,
    pub epochs:                usize,
    pub learning_rate:         f64,
    pub embedding_dim:         usize,
    pub hidden_dim:            usize,
    pub dropout:               f64,
    pub valid_fraction:        f64,
    pub balance_classes:       bool,
    pub seed:                  u64,
    pub num_workers:           usize,
    pub backend:               BackendKind,
}

impl Default for SentimentTrainConfig {
    fn default() -> Self {
        Self {
            train_csv:             "data/train.csv".to_string(),
            unlabeled_csv:         None,
            unlabeled_text_column: "Category".to_string(),
            checkpoint_dir:        "checkpoints".to_string(),
            seq_length:            32,
            batch_size:            32,
            epochs:                100,
            learning_rate:         3e-4,
            embedding_dim:         64,
            hidden_dim:            32,
            dropout:               0.2,
            valid_fraction:        0.15,
            balance_classes:       true,
            seed:                  42,
            num_workers:           1,
            backend:               BackendKind::default(),
        }
    }
}

impl SentimentTrainConfig {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.epochs > 0, "epochs must be positive");
        anyhow::ensure!(self.batch_size > 0, "batch size must be positive");
        anyhow::ensure!(
            self.seq_length >= MIN_SEQ_LENGTH,
            "sequence length must be at least {MIN_SEQ_LENGTH}, got {}",
            self.seq_length
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&self.valid_fraction),
            "validation fraction must be in [0, 1), got {}",
            self.valid_fraction
        );
        Ok(())
    }

    pub fn model_config(&self, vocab_size: usize) -> SentimentLstmConfig {
        SentimentLstmConfig::new(vocab_size)
            .with_embedding_dim(self.embedding_dim)
            .with_hidden_dim(self.hidden_dim)
            .with_dropout(self.dropout)
            .with_num_classes(Sentiment::ALL.len())
    }
}

// ─── SentimentTrainUseCase ───────────────────────────────────────────────────
pub struct SentimentTrainUseCase {
    config: SentimentTrainConfig,
}

impl SentimentTrainUseCase {
    pub fn new(config: SentimentTrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline on the configured backend; returns the
    /// final validation score.
    pub fn execute(&self) -> Result<Evaluation> {
        match self.config.backend {
            BackendKind::Ndarray => self.execute_on::<CpuBackend>(cpu_device()),
            BackendKind::Wgpu    => self.execute_on::<GpuBackend>(gpu_device()),
        }
    }

    pub fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<Evaluation> {
        let cfg = &self.config;
        cfg.validate()?;
        B::seed(cfg.seed);

        // ── Step 1: Load labelled tweets ──────────────────────────────────────
        let labeled: Vec<(Sentiment, String)> = TweetCsvLoader::labeled(&cfg.train_csv)
            .load_all()?
            .into_iter()
            .filter_map(|r| r.label.map(|label| (label, r.text)))
            .collect();
        anyhow::ensure!(!labeled.is_empty(), "no labelled tweets in '{}'", cfg.train_csv);

        // ── Step 2: Balance the classes ───────────────────────────────────────
        let labeled = if cfg.balance_classes {
            let balanced = undersample(labeled, |(label, _)| *label, cfg.seed);
            tracing::info!("Balanced corpus: {} tweets", balanced.len());
            balanced
        } else {
            labeled
        };

        // ── Step 3: Train / validation split ──────────────────────────────────
        let (train_raw, valid_raw) = split_train_val(labeled, 1.0 - cfg.valid_fraction, cfg.seed);
        tracing::info!("Split: {} train, {} validation", train_raw.len(), valid_raw.len());

        // ── Step 4: Clean and tokenise ────────────────────────────────────────
        let preprocessor = TweetPreprocessor::new();
        let tokenize = |rows: Vec<(Sentiment, String)>| -> Vec<(Sentiment, Vec<String>)> {
            rows.into_iter()
                .map(|(label, text)| (label, preprocessor.process(&text)))
                .collect()
        };
        let train_tokens = tokenize(train_raw);
        let valid_tokens = tokenize(valid_raw);

        let extra_tokens: Vec<Vec<String>> = match &cfg.unlabeled_csv {
            Some(path) => TweetCsvLoader::unlabeled(path, &cfg.unlabeled_text_column)
                .load_all()?
                .iter()
                .map(|r| preprocessor.process(&r.text))
                .collect(),
            None => Vec::new(),
        };

        // ── Step 5: Vocabulary + fixed-length encoding ────────────────────────
        let vocab = Vocabulary::build(
            train_tokens
                .iter()
                .chain(valid_tokens.iter())
                .map(|(_, tokens)| tokens)
                .chain(extra_tokens.iter()),
        );
        tracing::info!("Vocabulary size: {}", vocab.len());

        let encode = |rows: &[(Sentiment, Vec<String>)]| -> Result<Vec<EncodedTweet>> {
            rows.iter()
                .map(|(label, tokens)| {
                    Ok(EncodedTweet::new(vocab.encode_and_pad(tokens, cfg.seq_length)?, *label))
                })
                .collect()
        };
        let train_encoded = encode(&train_tokens)?;
        let valid_encoded = encode(&valid_tokens)?;

        // ── Step 6: Persist what prediction needs ─────────────────────────────
        let ckpt    = CheckpointManager::new(&cfg.checkpoint_dir, SENTIMENT_PREFIX)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir, SENTIMENT_PREFIX)?;
        ckpt.save_json(CONFIG_FILE, cfg)?;
        ckpt.save_json(VOCAB_FILE, &vocab)?;

        // ── Step 7: Train ─────────────────────────────────────────────────────
        let model = cfg.model_config(vocab.len()).init::<B>(&device);

        let train_loader = DataLoaderBuilder::new(SentimentBatcher::<B>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .num_workers(cfg.num_workers)
            .build(SentimentDataset::new(train_encoded));
        let valid_loader = DataLoaderBuilder::new(SentimentBatcher::<B::InnerBackend>::new(device))
            .batch_size(cfg.batch_size)
            .num_workers(cfg.num_workers)
            .build(SentimentDataset::new(valid_encoded));

        let opts = FitOptions { epochs: cfg.epochs, learning_rate: cfg.learning_rate };
        let mut best_valid_loss = f64::INFINITY;

        let model = fit(
            model,
            AdamConfig::new().init(),
            &opts,
            train_loader.as_ref(),
            valid_loader.as_ref(),
            |model, m| {
                ckpt.save_model(model, m.epoch)?;
                metrics.log(m)?;
                if m.is_improvement(best_valid_loss) {
                    best_valid_loss = m.valid_loss;
                    tracing::info!("Epoch {} is the best so far (valid_loss={:.4})", m.epoch, m.valid_loss);
                }
                Ok(())
            },
        )?;

        let eval = evaluate(&model.valid(), valid_loader.as_ref());
        println!(
            "Validation accuracy on {} tweets: {:.2} %",
            eval.total,
            eval.accuracy() * 100.0
        );
        Ok(eval)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{fmt::Write as _, fs, path::Path};

    /// A small, clearly separable corpus: one vocabulary per class.
    pub(crate) fn write_corpus(dir: &Path) -> String {
        let mut csv = String::from("Id,Category,Tweet\n");
        let words = [
            ("negative", "awful terrible"),
            ("neutral", "meeting tuesday"),
            ("positive", "lovely wonderful"),
        ];
        for i in 0..30 {
            let (label, text) = words[i % 3];
            writeln!(csv, "{i},{label},\"{text} #{i}, RT\"").unwrap();
        }
        writeln!(csv, "99,positive,Not Available").unwrap();
        let path = dir.join("train.csv");
        fs::write(&path, csv).unwrap();
        path.display().to_string()
    }

    pub(crate) fn tiny_config(train_csv: String, checkpoint_dir: &Path) -> SentimentTrainConfig {
        SentimentTrainConfig {
            train_csv,
            checkpoint_dir: checkpoint_dir.display().to_string(),
            seq_length:     8,
            batch_size:     8,
            epochs:         2,
            learning_rate:  1e-2,
            embedding_dim:  8,
            hidden_dim:     8,
            valid_fraction: 0.2,
            backend:        BackendKind::Ndarray,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_short_sequences() {
        let cfg = SentimentTrainConfig { seq_length: 2, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_corpus_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = tiny_config(dir.path().join("nope.csv").display().to_string(), dir.path());
        assert!(SentimentTrainUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_tiny_end_to_end_run() {
        let data = tempfile::tempdir().unwrap();
        let ckpt = tempfile::tempdir().unwrap();
        let mut cfg = tiny_config(write_corpus(data.path()), ckpt.path());

        let unlabeled = data.path().join("test.csv");
        fs::write(&unlabeled, "Id,Category\n1,brand new words here\n").unwrap();
        cfg.unlabeled_csv = Some(unlabeled.display().to_string());

        let eval = SentimentTrainUseCase::new(cfg).execute().unwrap();
        // 30 balanced tweets, 20% held out → 24 train, 6 valid.
        assert_eq!(eval.total, 6);

        let ckpt_mgr = CheckpointManager::new(ckpt.path(), SENTIMENT_PREFIX).unwrap();
        let vocab: Vocabulary = ckpt_mgr.load_json(VOCAB_FILE).unwrap();
        assert!(vocab.contains("tuesday"));
        // Words are stored stemmed.
        assert!(!vocab.contains("lovely"));
        assert!(vocab.contains("brand"));
        assert_eq!(ckpt_mgr.latest_epoch().unwrap(), 2);
    }
}
