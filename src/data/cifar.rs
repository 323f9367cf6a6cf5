// ============================================================
// Layer 4 — CIFAR-10 Loader
// ============================================================
// Reads the "binary version" of CIFAR-10.
//
// Each file is a flat sequence of 3073-byte records:
//
//   <1 byte label> <1024 red> <1024 green> <1024 blue>
//
// where every colour plane is a row-major 32×32 image.
// The label is a class index in 0..=9.
//
// Files (all in the same directory):
//   data_batch_1.bin … data_batch_5.bin   → training split
//   test_batch.bin                        → test split
//
// Nothing is downloaded; the files must already be on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::image::{ImageRecord, CIFAR10_CLASSES, IMAGE_BYTES};
use crate::domain::traits::RecordSource;

/// Bytes per record: one label byte plus the pixel planes.
pub const RECORD_BYTES: usize = 1 + IMAGE_BYTES;

#[derive(Debug, Error)]
pub enum CifarError {
    #[error("'{path}' is {len} bytes, not a whole number of {}-byte records", RECORD_BYTES)]
    TruncatedFile { path: String, len: usize },

    #[error("record {index} in '{path}' has label {label}, expected 0..=9")]
    InvalidLabel { path: String, index: usize, label: u8 },
}

/// Which half of the dataset to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CifarSplit {
    Train,
    Test,
}

impl CifarSplit {
    pub fn file_names(self) -> Vec<String> {
        match self {
            CifarSplit::Train => (1..=5).map(|i| format!("data_batch_{i}.bin")).collect(),
            CifarSplit::Test  => vec!["test_batch.bin".to_string()],
        }
    }
}

/// Loads one split of CIFAR-10 from a directory of `.bin` batches.
pub struct CifarLoader {
    dir:   PathBuf,
    split: CifarSplit,
}

impl CifarLoader {
    pub fn new(dir: impl Into<PathBuf>, split: CifarSplit) -> Self {
        Self { dir: dir.into(), split }
    }

    /// True if at least one batch file of this split exists.
    pub fn is_available(&self) -> bool {
        self.split
            .file_names()
            .iter()
            .any(|name| self.dir.join(name).is_file())
    }
}

impl RecordSource<ImageRecord> for CifarLoader {
    fn load_all(&self) -> Result<Vec<ImageRecord>> {
        anyhow::ensure!(
            self.dir.is_dir(),
            "CIFAR-10 directory '{}' does not exist",
            self.dir.display()
        );

        let mut records = Vec::new();
        for name in self.split.file_names() {
            let path = self.dir.join(&name);
            if !path.is_file() {
                tracing::warn!("Missing CIFAR-10 batch '{}', skipping", path.display());
                continue;
            }
            let batch = load_batch_file(&path)?;
            tracing::debug!("Loaded {} images from '{}'", batch.len(), path.display());
            records.extend(batch);
        }

        anyhow::ensure!(
            !records.is_empty(),
            "No {:?} images found in '{}'",
            self.split,
            self.dir.display()
        );

        tracing::info!("Loaded {} {:?} images", records.len(), self.split);
        Ok(records)
    }
}

fn load_batch_file(path: &Path) -> Result<Vec<ImageRecord>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    Ok(parse_records(&bytes, &path.display().to_string())?)
}

/// Split a raw batch file into records.
/// `source` is only used in error messages.
pub fn parse_records(bytes: &[u8], source: &str) -> Result<Vec<ImageRecord>, CifarError> {
    if bytes.len() % RECORD_BYTES != 0 {
        return Err(CifarError::TruncatedFile {
            path: source.to_string(),
            len:  bytes.len(),
        });
    }

    bytes
        .chunks_exact(RECORD_BYTES)
        .enumerate()
        .map(|(index, chunk)| {
            let label = chunk[0];
            if label as usize >= CIFAR10_CLASSES.len() {
                return Err(CifarError::InvalidLabel {
                    path: source.to_string(),
                    index,
                    label,
                });
            }
            Ok(ImageRecord::new(chunk[1..].to_vec(), label))
        })
        .collect()
}
