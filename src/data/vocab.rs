// ============================================================
// Layer 4 — Vocabulary & Fixed-Length Encoding
// ============================================================
// Maps every distinct token to a unique integer index and
// turns token lists into fixed-length index sequences.
//
// Reserved indices:
//   0 → <PAD>   fills the tail of short sequences
//   1 → <SOS>   marks the start of every sequence
//   2 → <EOS>   marks the end of the real tokens
//
// Every other token gets the next free index in the order it
// is first seen.
//
// Encoding to length L (L >= 3):
//
//   short:  [<SOS>, t1, t2, <EOS>, <PAD>, <PAD>, ...]   (len(t) < L-2)
//   long:   [<SOS>, t1, ..., t(L-2), <EOS>]             (truncated)
//
// The vocabulary is stored on disk as its index → word list;
// the reverse map is rebuilt on load.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const PAD: &str = "<PAD>";
pub const SOS: &str = "<SOS>";
pub const EOS: &str = "<EOS>";

pub const PAD_ID: u32 = 0;
pub const SOS_ID: u32 = 1;
pub const EOS_ID: u32 = 2;

/// Shortest sequence that still holds <SOS>, one token and <EOS>.
pub const MIN_SEQ_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    index2word: Vec<String>,
    word2index: HashMap<String, u32>,
}

impl Vocabulary {
    /// A vocabulary holding only the reserved tokens.
    pub fn new() -> Self {
        let mut vocab = Self {
            index2word: Vec::new(),
            word2index: HashMap::new(),
        };
        for token in [PAD, SOS, EOS] {
            vocab.insert(token);
        }
        vocab
    }

    /// Build from any number of tokenised texts, in first-seen order.
    pub fn build<'a, I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = &'a String>,
    {
        let mut vocab = Self::new();
        for text in texts {
            for token in text {
                vocab.insert(token);
            }
        }
        tracing::debug!("Vocabulary built with {} entries", vocab.len());
        vocab
    }

    /// Add `token` if unseen and return its index.
    pub fn insert(&mut self, token: &str) -> u32 {
        if let Some(&idx) = self.word2index.get(token) {
            return idx;
        }
        let idx = self.index2word.len() as u32;
        self.index2word.push(token.to_string());
        self.word2index.insert(token.to_string(), idx);
        idx
    }

    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.word2index.get(token).copied()
    }

    pub fn word_of(&self, index: u32) -> Option<&str> {
        self.index2word.get(index as usize).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.word2index.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.index2word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index2word.is_empty()
    }

    /// Encode `tokens` into exactly `length` indices.
    ///
    /// Tokens missing from the vocabulary are skipped before the
    /// pad/truncate decision.
    pub fn encode_and_pad<S: AsRef<str>>(&self, tokens: &[S], length: usize) -> Result<Vec<u32>> {
        anyhow::ensure!(
            length >= MIN_SEQ_LENGTH,
            "sequence length must be at least {MIN_SEQ_LENGTH}, got {length}"
        );

        let encoded: Vec<u32> = tokens
            .iter()
            .filter_map(|t| self.index_of(t.as_ref()))
            .collect();
        let body = length - 2; // room left after <SOS> and <EOS>

        let mut out = Vec::with_capacity(length);
        out.push(SOS_ID);
        if encoded.len() < body {
            out.extend_from_slice(&encoded);
            out.push(EOS_ID);
            out.resize(length, PAD_ID);
        } else {
            out.extend_from_slice(&encoded[..body]);
            out.push(EOS_ID);
        }
        Ok(out)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = anyhow::Error;

    fn try_from(words: Vec<String>) -> Result<Self> {
        anyhow::ensure!(
            words.len() >= 3 && words[0] == PAD && words[1] == SOS && words[2] == EOS,
            "vocabulary must start with {PAD}, {SOS}, {EOS}"
        );
        let mut vocab = Self {
            index2word: Vec::with_capacity(words.len()),
            word2index: HashMap::with_capacity(words.len()),
        };
        for word in words {
            anyhow::ensure!(!vocab.contains(&word), "duplicate vocabulary entry '{word}'");
            vocab.insert(&word);
        }
        Ok(vocab)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.index2word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn sample_vocab() -> Vocabulary {
        let a = toks(&["good", "day", "good"]);
        let b = toks(&["bad", "day"]);
        Vocabulary::build([&a, &b])
    }

    #[test]
    fn test_reserved_tokens_come_first() {
        let v = Vocabulary::new();
        assert_eq!(v.index_of(PAD), Some(PAD_ID));
        assert_eq!(v.index_of(SOS), Some(SOS_ID));
        assert_eq!(v.index_of(EOS), Some(EOS_ID));
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_first_seen_order_and_unique_indices() {
        let v = sample_vocab();
        assert_eq!(v.len(), 6);
        assert_eq!(v.index_of("good"), Some(3));
        assert_eq!(v.index_of("day"), Some(4));
        assert_eq!(v.index_of("bad"), Some(5));
        for i in 0..v.len() as u32 {
            assert_eq!(v.index_of(v.word_of(i).unwrap()), Some(i));
        }
    }

    #[test]
    fn test_short_sequence_is_padded() {
        let v = sample_vocab();
        let ids = v.encode_and_pad(&toks(&["good", "day"]), 7).unwrap();
        assert_eq!(ids, vec![SOS_ID, 3, 4, EOS_ID, PAD_ID, PAD_ID, PAD_ID]);
    }

    #[test]
    fn test_long_sequence_is_truncated() {
        let v = sample_vocab();
        let ids = v.encode_and_pad(&toks(&["good", "day", "bad", "good"]), 4).unwrap();
        assert_eq!(ids, vec![SOS_ID, 3, 4, EOS_ID]);
    }

    #[test]
    fn test_exact_fit_has_no_padding() {
        let v = sample_vocab();
        let ids = v.encode_and_pad(&toks(&["good", "day"]), 4).unwrap();
        assert_eq!(ids, vec![SOS_ID, 3, 4, EOS_ID]);
    }

    #[test]
    fn test_unknown_tokens_are_skipped() {
        let v = sample_vocab();
        let ids = v.encode_and_pad(&toks(&["good", "zebra", "bad"]), 5).unwrap();
        assert_eq!(ids, vec![SOS_ID, 3, 5, EOS_ID, PAD_ID]);
    }

    #[test]
    fn test_empty_tokens_still_fill_length() {
        let v = sample_vocab();
        let empty: Vec<String> = Vec::new();
        assert_eq!(v.encode_and_pad(&empty, 3).unwrap(), vec![SOS_ID, EOS_ID, PAD_ID]);
    }

    #[test]
    fn test_too_short_length_is_an_error() {
        let v = sample_vocab();
        assert!(v.encode_and_pad(&toks(&["good"]), 2).is_err());
    }

    #[test]
    fn test_json_keeps_indices() {
        let v = sample_vocab();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["<PAD>","<SOS>","<EOS>","good","day","bad"]"#);
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_rejects_corrupt_word_list() {
        assert!(serde_json::from_str::<Vocabulary>(r#"["good","<SOS>","<EOS>"]"#).is_err());
        assert!(serde_json::from_str::<Vocabulary>(r#"["<PAD>","<SOS>","<EOS>","a","a"]"#).is_err());
    }
}
