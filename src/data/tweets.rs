// ============================================================
// Layer 4 — Tweet CSV Loader
// ============================================================
// Reads tweets from a CSV file with a header row, e.g.
//
//   Id,Category,Tweet
//   635769805279248384,negative,"Not Available"
//   635930169241374720,neutral,"IOS 9 App Transport Security. Mm..."
//
// Tweets contain commas and quotes, so the csv crate does the
// field splitting.
//
// Rows are dropped (not errors) when:
//   - the text cell is empty or the literal "Not Available"
//   - the label cell is empty, or not one of the three classes
//   - the row itself is malformed

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::sentiment::{Sentiment, TweetRecord};
use crate::domain::traits::RecordSource;

/// Placeholder the tweet corpus uses for deleted tweets.
const NOT_AVAILABLE: &str = "Not Available";

pub struct TweetCsvLoader {
    path:         PathBuf,
    text_column:  String,
    label_column: Option<String>,
}

impl TweetCsvLoader {
    /// A labelled corpus: `Category` holds the label, `Tweet` the text.
    pub fn labeled(path: impl Into<PathBuf>) -> Self {
        Self {
            path:         path.into(),
            text_column:  "Tweet".to_string(),
            label_column: Some("Category".to_string()),
        }
    }

    /// An unlabelled corpus with the text in `text_column`.
    pub fn unlabeled(path: impl Into<PathBuf>, text_column: impl Into<String>) -> Self {
        Self {
            path:         path.into(),
            text_column:  text_column.into(),
            label_column: None,
        }
    }
}

impl RecordSource<TweetRecord> for TweetCsvLoader {
    fn load_all(&self) -> Result<Vec<TweetRecord>> {
        if !self.path.exists() {
            tracing::warn!(
                "Tweet file '{}' does not exist, returning empty corpus",
                self.path.display()
            );
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", self.path.display()))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .with_context(|| format!("'{}' has no '{name}' column", self.path.display()))
        };
        let text_idx  = column(&self.text_column)?;
        let label_idx = self.label_column.as_deref().map(column).transpose()?;

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for (row, result) in reader.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Skipping malformed row {} of '{}': {}", row + 1, self.path.display(), e);
                    dropped += 1;
                    continue;
                }
            };

            let text = record.get(text_idx).unwrap_or("").trim();
            if text.is_empty() || text == NOT_AVAILABLE {
                dropped += 1;
                continue;
            }

            let label = match label_idx {
                None => None,
                Some(idx) => {
                    let raw = record.get(idx).unwrap_or("").trim();
                    if raw.is_empty() {
                        dropped += 1;
                        continue;
                    }
                    match raw.parse::<Sentiment>() {
                        Ok(sentiment) => Some(sentiment),
                        Err(e) => {
                            tracing::warn!("Skipping row {}: {}", row + 1, e);
                            dropped += 1;
                            continue;
                        }
                    }
                }
            };

            records.push(TweetRecord::new(label, text));
        }

        tracing::info!(
            "Loaded {} tweets from '{}' ({} rows dropped)",
            records.len(),
            self.path.display(),
            dropped
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_loads_labeled_rows_with_quoted_commas() {
        let (_dir, path) = write_csv(
            "Id,Category,Tweet\n\
             1,negative,\"bad, very bad\"\n\
             2,Positive,great day\n",
        );
        let records = TweetCsvLoader::labeled(&path).load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], TweetRecord::new(Some(Sentiment::Negative), "bad, very bad"));
        assert_eq!(records[1].label, Some(Sentiment::Positive));
    }

    #[test]
    fn test_drops_unavailable_empty_and_unknown_rows() {
        let (_dir, path) = write_csv(
            "Id,Category,Tweet\n\
             1,neutral,Not Available\n\
             2,neutral,\n\
             3,,orphan text\n\
             4,mixed,what is this\n\
             5,neutral,fine\n",
        );
        let records = TweetCsvLoader::labeled(&path).load_all().unwrap();
        assert_eq!(records, vec![TweetRecord::new(Some(Sentiment::Neutral), "fine")]);
    }

    #[test]
    fn test_skips_row_with_invalid_utf8() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        let mut bytes = b"Id,Category,Tweet\n1,positive,good one\n".to_vec();
        bytes.extend_from_slice(b"2,neutral,bad \xff\xfe bytes\n");
        bytes.extend_from_slice(b"3,negative,awful one\n");
        fs::write(&path, bytes).unwrap();

        let records = TweetCsvLoader::labeled(&path).load_all().unwrap();
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["good one", "awful one"]);
    }

    #[test]
    fn test_unlabeled_corpus() {
        let (_dir, path) = write_csv("Id,Category\n1,some tweet text\n2,Not Available\n");
        let records = TweetCsvLoader::unlabeled(&path, "Category").load_all().unwrap();
        assert_eq!(records, vec![TweetRecord::new(None, "some tweet text")]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let (_dir, path) = write_csv("Id,Text\n1,hello\n");
        assert!(TweetCsvLoader::labeled(&path).load_all().is_err());
    }

    #[test]
    fn test_missing_file_gives_empty_corpus() {
        let records = TweetCsvLoader::labeled("/no/such/file.csv").load_all().unwrap();
        assert!(records.is_empty());
    }
}
