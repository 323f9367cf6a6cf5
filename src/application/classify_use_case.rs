// ============================================================
// Layer 2 — Classify Use Case
// ============================================================
// Rebuilds a trained sentiment model from its checkpoint
// directory and scores single tweets:
//   1. Read the training config and vocabulary JSON
//   2. Rebuild the LSTM and load the latest weights
//   3. Clean, tokenise, encode and pad the tweet
//   4. Softmax over the logits, pick the best class

use anyhow::{Context, Result};
use burn::{prelude::*, tensor::activation::softmax};

use crate::application::sentiment_use_case::{
    SentimentTrainConfig, CONFIG_FILE, SENTIMENT_PREFIX, VOCAB_FILE,
};
use crate::data::{batcher::token_tensor, preprocessor::TweetPreprocessor, vocab::Vocabulary};
use crate::domain::{
    sentiment::{Prediction, Sentiment},
    traits::SentimentClassifier,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::lstm::SentimentLstm;

pub struct ClassifyUseCase<B: Backend> {
    model:        SentimentLstm<B>,
    vocab:        Vocabulary,
    preprocessor: TweetPreprocessor,
    seq_length:   usize,
    device:       B::Device,
}

impl<B: Backend> ClassifyUseCase<B> {
    /// Load everything a sentiment training run left in `checkpoint_dir`.
    pub fn load(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        let ckpt = CheckpointManager::new(checkpoint_dir, SENTIMENT_PREFIX)?;
        let cfg: SentimentTrainConfig = ckpt.load_json(CONFIG_FILE)?;
        let vocab: Vocabulary = ckpt.load_json(VOCAB_FILE)?;

        let model = cfg.model_config(vocab.len()).init::<B>(&device);
        let model = ckpt.load_model(model, &device)?;
        tracing::info!("Sentiment model loaded ({} vocabulary entries)", vocab.len());

        Ok(Self {
            model,
            vocab,
            preprocessor: TweetPreprocessor::new(),
            seq_length:   cfg.seq_length,
            device,
        })
    }
}

impl<B: Backend> SentimentClassifier for ClassifyUseCase<B> {
    fn classify(&self, text: &str) -> Result<Prediction> {
        let tokens = self.preprocessor.process(text);
        if tokens.iter().all(|t| !self.vocab.contains(t)) {
            tracing::warn!("No known words in '{text}', the prediction rests on padding alone");
        }
        let ids = self.vocab.encode_and_pad(&tokens, self.seq_length)?;

        let input  = token_tensor::<B>(&[ids.as_slice()], &self.device);
        let probs  = softmax(self.model.forward(input), 1); // [1, num_classes]
        let probs: Vec<f32> = probs
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))?;

        let (best, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .context("Model produced no class scores")?;
        let sentiment = Sentiment::from_index(best)
            .with_context(|| format!("Model predicted unknown class {best}"))?;

        Ok(Prediction { sentiment, confidence })
    }
}
