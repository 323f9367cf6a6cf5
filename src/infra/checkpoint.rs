// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder,
// plus the JSON side files needed to rebuild a model later.
//
// Both pipelines can share one checkpoint directory; every file
// name starts with the model's prefix:
//
//   checkpoints/
//     alexnet_epoch_1.mpk              ← weights after epoch 1
//     alexnet_latest_epoch.json        ← number of the latest epoch
//     alexnet_config.json              ← training configuration
//     sentiment_lstm_epoch_1.mpk
//     sentiment_lstm_latest_epoch.json
//     sentiment_lstm_config.json
//     sentiment_lstm_vocab.json        ← index → word list
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Stores floats at half precision
//   - Type-safe: loading fails if architecture doesn't match

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::CompactRecorder,
};
use serde::{de::DeserializeOwned, Serialize};

/// Manages saving and loading of one model's checkpoints.
pub struct CheckpointManager {
    /// Path to the directory where checkpoints are stored
    dir:    PathBuf,
    /// File name prefix, e.g. "alexnet"
    prefix: String,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir, prefix: prefix.into() })
    }

    fn path(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{suffix}", self.prefix))
    }

    /// Save model weights for a given epoch and mark it as latest.
    pub fn save_model<B: Backend, M: Module<B>>(&self, model: &M, epoch: usize) -> Result<()> {
        // The recorder adds the extension
        let path = self.path(&format!("epoch_{epoch}"));

        model
            .clone()
            .save_file(path.clone(), &CompactRecorder::new())
            .map_err(|e| anyhow::anyhow!("Failed to save checkpoint to '{}': {e:?}", path.display()))?;

        self.save_json("latest_epoch.json", &epoch)?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load weights from the latest saved checkpoint into `model`.
    ///
    /// The model parameter must have the correct architecture
    /// (matching the saved checkpoint) or loading will fail.
    pub fn load_model<B: Backend, M: Module<B>>(&self, model: M, device: &B::Device) -> Result<M> {
        let epoch = self.latest_epoch()?;
        let path  = self.path(&format!("epoch_{epoch}"));

        tracing::info!("Loading {} checkpoint from epoch {}", self.prefix, epoch);

        model
            .load_file(path.clone(), &CompactRecorder::new(), device)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Cannot load checkpoint '{}'. Have you trained the model first? ({e:?})",
                    path.display()
                )
            })
    }

    /// Write `value` as pretty JSON to `<prefix>_<name>`.
    pub fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    /// Read `<prefix>_<name>` back from JSON.
    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path(name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!("Cannot read '{}'. Make sure training has been run first.", path.display())
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed JSON in '{}'", path.display()))
    }

    /// Number of the most recently saved epoch.
    pub fn latest_epoch(&self) -> Result<usize> {
        self.load_json("latest_epoch.json")
    }
}
