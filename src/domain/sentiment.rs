// ============================================================
// Layer 3 — Sentiment Domain Types
// ============================================================
// The tweet corpus labels every record with one of three
// classes. The model predicts a score for each class, so the
// class also needs a stable integer index:
//
//   negative → 0
//   neutral  → 1
//   positive → 2

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The three sentiment classes, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Every class in index order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    /// The class index used as the training target
    pub fn index(self) -> usize {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral  => 1,
            Sentiment::Positive => 2,
        }
    }

    /// Inverse of [`Sentiment::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral  => "neutral",
            Sentiment::Positive => "positive",
        };
        f.write_str(name)
    }
}

impl FromStr for Sentiment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negative" => Ok(Sentiment::Negative),
            "neutral"  => Ok(Sentiment::Neutral),
            "positive" => Ok(Sentiment::Positive),
            other      => Err(anyhow::anyhow!("unknown sentiment label '{other}'")),
        }
    }
}

/// A tweet as read from disk, before any cleaning.
/// `label` is `None` for unlabelled corpora.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetRecord {
    pub label: Option<Sentiment>,
    pub text:  String,
}

impl TweetRecord {
    pub fn new(label: Option<Sentiment>, text: impl Into<String>) -> Self {
        Self { label, text: text.into() }
    }
}

/// The classifier's answer for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub sentiment:  Sentiment,
    /// Softmax probability of the predicted class
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for s in Sentiment::ALL {
            assert_eq!(Sentiment::from_index(s.index()), Some(s));
        }
        assert_eq!(Sentiment::from_index(3), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!(" neutral ".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert_eq!("POSITIVE".parse::<Sentiment>().unwrap(), Sentiment::Positive);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        assert!("mixed".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Sentiment::Neutral.to_string(), "neutral");
    }
}
