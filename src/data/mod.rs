// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw files on disk and tensor batches.
//
// Image pipeline:
//
//   data_batch_*.bin
//       │
//       ▼
//   CifarLoader       → parses 3073-byte records
//       │
//       ▼
//   split_train_val   → seeded 90/10 split
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → augment, normalise, resize, stack
//
// Sentiment pipeline:
//
//   train.csv
//       │
//       ▼
//   TweetCsvLoader    → labelled tweets, junk rows dropped
//       │
//       ▼
//   undersample       → equal class sizes
//       │
//       ▼
//   split_train_val   → seeded 85/15 split
//       │
//       ▼
//   TweetPreprocessor → clean tweet text into tokens
//       │
//       ▼
//   Vocabulary        → token → index, pad/truncate to length L
//       │
//       ▼
//   SentimentDataset  → implements Burn's Dataset trait
//       │
//       ▼
//   SentimentBatcher  → stacks sequences into [N, L]

/// Reads CIFAR-10 binary batch files
pub mod cifar;

/// Random crop and horizontal flip for training images
pub mod augment;

/// Reads labelled and unlabelled tweet CSV files
pub mod tweets;

/// Cleans and tokenises raw tweet text
pub mod preprocessor;

/// Undersamples every class to the minority class size
pub mod balance;

/// Shuffles and splits data into train/validation sets
pub mod splitter;

/// Token vocabulary and fixed-length sequence encoding
pub mod vocab;

/// Implements Burn's Dataset trait for both pipelines
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
