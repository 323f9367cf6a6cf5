// ============================================================
// Layer 4 — Image Augmentation
// ============================================================
// Training-time augmentation for 3×32×32 CHW images:
//
//   1. Random crop: zero-pad every side by `padding` pixels,
//      then cut a random 32×32 window out of the padded image.
//   2. Random horizontal flip with probability 0.5.
//
// Both steps work on raw bytes, before normalisation, so a
// padded pixel is 0 exactly like a zero-filled tensor would be.

use rand::Rng;

use crate::domain::image::{IMAGE_BYTES, IMAGE_CHANNELS, IMAGE_SIDE};

#[derive(Debug, Clone, Copy)]
pub struct Augmenter {
    padding:   usize,
    flip_prob: f64,
}

impl Augmenter {
    pub fn new(padding: usize, flip_prob: f64) -> Self {
        Self { padding, flip_prob }
    }

    /// Crop then maybe flip. Always returns `IMAGE_BYTES` bytes.
    pub fn apply<R: Rng + ?Sized>(&self, pixels: &[u8], rng: &mut R) -> Vec<u8> {
        let mut out = random_crop(pixels, self.padding, rng);
        if rng.gen_bool(self.flip_prob) {
            out = horizontal_flip(&out);
        }
        out
    }
}

impl Default for Augmenter {
    /// Pad 4, flip half the time.
    fn default() -> Self {
        Self::new(4, 0.5)
    }
}

/// Zero-pad by `padding` and crop a random 32×32 window.
pub fn random_crop<R: Rng + ?Sized>(pixels: &[u8], padding: usize, rng: &mut R) -> Vec<u8> {
    let dx = rng.gen_range(0..=2 * padding);
    let dy = rng.gen_range(0..=2 * padding);
    crop_at(pixels, padding, dx, dy)
}

/// Crop the window whose top-left corner sits at (`dx`, `dy`) in
/// the padded image. (`padding`, `padding`) returns the input unchanged.
pub fn crop_at(pixels: &[u8], padding: usize, dx: usize, dy: usize) -> Vec<u8> {
    debug_assert_eq!(pixels.len(), IMAGE_BYTES);
    let plane = IMAGE_SIDE * IMAGE_SIDE;
    let mut out = vec![0u8; IMAGE_BYTES];

    for c in 0..IMAGE_CHANNELS {
        for y in 0..IMAGE_SIDE {
            // Row in the original image, if this row is not padding.
            let Some(src_y) = (y + dy).checked_sub(padding).filter(|&v| v < IMAGE_SIDE) else {
                continue;
            };
            for x in 0..IMAGE_SIDE {
                let Some(src_x) = (x + dx).checked_sub(padding).filter(|&v| v < IMAGE_SIDE) else {
                    continue;
                };
                out[c * plane + y * IMAGE_SIDE + x] = pixels[c * plane + src_y * IMAGE_SIDE + src_x];
            }
        }
    }
    out
}

/// Mirror every row of every channel.
pub fn horizontal_flip(pixels: &[u8]) -> Vec<u8> {
    let mut out = pixels.to_vec();
    for row in out.chunks_exact_mut(IMAGE_SIDE) {
        row.reverse();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn gradient_image() -> Vec<u8> {
        (0..IMAGE_BYTES).map(|i| (i % 251) as u8 + 1).collect()
    }

    #[test]
    fn test_flip_mirrors_rows() {
        let img = gradient_image();
        let flipped = horizontal_flip(&img);
        assert_eq!(flipped[0], img[IMAGE_SIDE - 1]);
        assert_eq!(flipped[IMAGE_SIDE], img[2 * IMAGE_SIDE - 1]);
        assert_eq!(horizontal_flip(&flipped), img);
    }

    #[test]
    fn test_centered_crop_is_identity() {
        let img = gradient_image();
        assert_eq!(crop_at(&img, 4, 4, 4), img);
    }

    #[test]
    fn test_corner_crop_shifts_in_zeros() {
        let img = gradient_image();
        let out = crop_at(&img, 4, 0, 0);
        // The first four rows and columns come from padding.
        assert_eq!(out[0], 0);
        assert_eq!(out[3 * IMAGE_SIDE + 10], 0);
        assert_eq!(out[10 * IMAGE_SIDE + 3], 0);
        // Pixel (4, 4) of the output is pixel (0, 0) of the input.
        assert_eq!(out[4 * IMAGE_SIDE + 4], img[0]);
    }

    #[test]
    fn test_augment_keeps_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let img = gradient_image();
        for _ in 0..10 {
            assert_eq!(Augmenter::default().apply(&img, &mut rng).len(), IMAGE_BYTES);
        }
    }

    #[test]
    fn test_apply_crops_then_flips_by_probability() {
        let img = gradient_image();
        for seed in 0..5 {
            // Replay the crop offsets from an identical RNG.
            let mut replay = StdRng::seed_from_u64(seed);
            let dx = replay.gen_range(0..=8usize);
            let dy = replay.gen_range(0..=8usize);
            let cropped = crop_at(&img, 4, dx, dy);

            let always = Augmenter::new(4, 1.0).apply(&img, &mut StdRng::seed_from_u64(seed));
            assert_eq!(always, horizontal_flip(&cropped));

            let never = Augmenter::new(4, 0.0).apply(&img, &mut StdRng::seed_from_u64(seed));
            assert_eq!(never, cropped);
        }
    }
}
