// ============================================================
// Layer 4 — Batchers
// ============================================================
// Implements Burn's Batcher trait for both pipelines. A
// batcher takes a Vec of samples and stacks them into tensors
// with the batch size as the first dimension.
//
//   ImageBatcher:
//     Vec<ImageRecord> → inputs  [N, 3, S, S]  (float)
//                        targets [N]           (int)
//
//   SentimentBatcher:
//     Vec<EncodedTweet> → inputs  [N, L]       (int token ids)
//                         targets [N]          (int)
//
// Image preprocessing happens here, per batch:
//   1. optional random crop + flip        (training only, seeded)
//   2. bytes → [0, 1]                     (x / 255)
//   3. per-channel normalisation          ((x - mean) / std)
//   4. bilinear resize 32×32 → S×S        (S = 227 for AlexNet)

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::{
        module::interpolate,
        ops::{InterpolateMode, InterpolateOptions},
    },
};
use rand::{rngs::StdRng, SeedableRng};

use crate::data::{augment::Augmenter, dataset::EncodedTweet};
use crate::domain::image::{ImageRecord, IMAGE_BYTES, IMAGE_CHANNELS, IMAGE_SIDE};

/// Per-channel mean of the CIFAR-10 training images.
pub const CIFAR_MEAN: [f32; 3] = [0.4914, 0.4822, 0.4465];

/// Per-channel standard deviation of the CIFAR-10 training images.
pub const CIFAR_STD: [f32; 3] = [0.2023, 0.1994, 0.2010];

// ─── LabeledBatch ─────────────────────────────────────────────────────────────
/// Model inputs plus one class index per sample.
#[derive(Debug, Clone)]
pub struct LabeledBatch<B: Backend, X> {
    pub inputs:  X,
    /// Ground truth class indices, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

fn targets_tensor<B: Backend>(labels: Vec<i64>, device: &B::Device) -> Tensor<B, 1, Int> {
    let n = labels.len();
    Tensor::from_data(TensorData::new(labels, [n]).convert::<B::IntElem>(), device)
}

// ─── ImageBatcher ─────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    device:     B::Device,
    /// Side length the images are resized to
    image_size: usize,
    /// Augmentation and its base seed
    augmenter:  Option<(Augmenter, u64)>,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device, image_size: usize) -> Self {
        Self { device, image_size, augmenter: None }
    }

    /// Enable random crop + flip for every image in every batch.
    pub fn with_augmenter(mut self, augmenter: Augmenter, seed: u64) -> Self {
        self.augmenter = Some((augmenter, seed));
        self
    }
}

/// RNG for one batch, derived from `seed` and the batch contents.
/// Worker threads may build batches in any order, so the stream
/// cannot be shared between batches.
fn batch_rng(seed: u64, items: &[ImageRecord]) -> StdRng {
    let mut hasher = DefaultHasher::new();
    for item in items {
        item.label.hash(&mut hasher);
        item.pixels.hash(&mut hasher);
    }
    StdRng::seed_from_u64(seed ^ hasher.finish())
}

/// Scale bytes to [0, 1] and normalise each channel plane.
pub fn normalize(pixels: &[u8]) -> Vec<f32> {
    let plane = IMAGE_SIDE * IMAGE_SIDE;
    pixels
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let c = i / plane;
            (p as f32 / 255.0 - CIFAR_MEAN[c]) / CIFAR_STD[c]
        })
        .collect()
}

impl<B: Backend> Batcher<ImageRecord, LabeledBatch<B, Tensor<B, 4>>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageRecord>) -> LabeledBatch<B, Tensor<B, 4>> {
        let batch_size = items.len();
        let mut pixels = Vec::with_capacity(batch_size * IMAGE_BYTES);
        let mut labels = Vec::with_capacity(batch_size);

        let mut augment = self
            .augmenter
            .map(|(aug, seed)| (aug, batch_rng(seed, &items)));

        for item in &items {
            match augment.as_mut() {
                Some((aug, rng)) => pixels.extend(normalize(&aug.apply(&item.pixels, rng))),
                None             => pixels.extend(normalize(&item.pixels)),
            }
            labels.push(item.label as i64);
        }

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, IMAGE_CHANNELS, IMAGE_SIDE, IMAGE_SIDE])
                .convert::<B::FloatElem>(),
            &self.device,
        );

        let images = if self.image_size == IMAGE_SIDE {
            images
        } else {
            interpolate(
                images,
                [self.image_size, self.image_size],
                InterpolateOptions::new(InterpolateMode::Bilinear),
            )
        };

        LabeledBatch {
            inputs:  images,
            targets: targets_tensor::<B>(labels, &self.device),
        }
    }
}

// ─── SentimentBatcher ─────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SentimentBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> SentimentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Stack equal-length id sequences into an `[n, len]` int tensor.
pub fn token_tensor<B: Backend>(sequences: &[&[u32]], device: &B::Device) -> Tensor<B, 2, Int> {
    let n       = sequences.len();
    let seq_len = sequences.first().map_or(0, |s| s.len());
    let flat: Vec<i64> = sequences
        .iter()
        .flat_map(|s| s.iter().map(|&id| id as i64))
        .collect();
    Tensor::from_data(TensorData::new(flat, [n, seq_len]).convert::<B::IntElem>(), device)
}

impl<B: Backend> Batcher<EncodedTweet, LabeledBatch<B, Tensor<B, 2, Int>>> for SentimentBatcher<B> {
    fn batch(&self, items: Vec<EncodedTweet>) -> LabeledBatch<B, Tensor<B, 2, Int>> {
        // All sequences have the same length (pre-padded)
        let sequences: Vec<&[u32]> = items.iter().map(|s| s.token_ids.as_slice()).collect();
        let labels: Vec<i64> = items.iter().map(|s| s.label.index() as i64).collect();

        LabeledBatch {
            inputs:  token_tensor::<B>(&sequences, &self.device),
            targets: targets_tensor::<B>(labels, &self.device),
        }
    }
}
