use burn::data::dataset::Dataset;

use crate::domain::image::ImageRecord;
use crate::domain::sentiment::Sentiment;

/// One tweet after cleaning and fixed-length encoding.
/// Sequence format: <SOS> tokens <EOS> <PAD>...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTweet {
    pub token_ids: Vec<u32>,
    pub label:     Sentiment,
}

impl EncodedTweet {
    pub fn new(token_ids: Vec<u32>, label: Sentiment) -> Self {
        Self { token_ids, label }
    }
}

pub struct ImageDataset {
    records: Vec<ImageRecord>,
}

impl ImageDataset {
    pub fn new(records: Vec<ImageRecord>) -> Self { Self { records } }
}

impl Dataset<ImageRecord> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageRecord> {
        self.records.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

pub struct SentimentDataset {
    samples: Vec<EncodedTweet>,
}

impl SentimentDataset {
    pub fn new(samples: Vec<EncodedTweet>) -> Self { Self { samples } }
}

impl Dataset<EncodedTweet> for SentimentDataset {
    fn get(&self, index: usize) -> Option<EncodedTweet> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
