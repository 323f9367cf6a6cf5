// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to loaders and classifiers
// through these traits, never through concrete types:
//   - CifarLoader and TweetCsvLoader implement RecordSource
//   - ClassifyUseCase implements SentimentClassifier

use anyhow::Result;

use crate::domain::sentiment::Prediction;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load raw training records.
///
/// Implementations:
///   - CifarLoader    → ImageRecord from CIFAR-10 binary batches
///   - TweetCsvLoader → TweetRecord from a CSV file
pub trait RecordSource<T> {
    /// Load every available record from this source.
    fn load_all(&self) -> Result<Vec<T>>;
}

// ─── SentimentClassifier ──────────────────────────────────────────────────────
/// Any component that can label a piece of text with a sentiment.
pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> Result<Prediction>;
}
