/// Side length of a CIFAR-10 image in pixels.
pub const IMAGE_SIDE: usize = 32;

/// Colour channels per image (R, G, B).
pub const IMAGE_CHANNELS: usize = 3;

/// Bytes of pixel data per image: three 32×32 planes.
pub const IMAGE_BYTES: usize = IMAGE_CHANNELS * IMAGE_SIDE * IMAGE_SIDE;

/// Class names in label order.
pub const CIFAR10_CLASSES: [&str; 10] = [
    "airplane",
    "automobile",
    "bird",
    "cat",
    "deer",
    "dog",
    "frog",
    "horse",
    "ship",
    "truck",
];

/// One labelled image.
///
/// Pixels are stored channel-major (CHW): 1024 red bytes, then
/// 1024 green, then 1024 blue, each plane row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub pixels: Vec<u8>,
    pub label:  u8,
}

impl ImageRecord {
    pub fn new(pixels: Vec<u8>, label: u8) -> Self {
        Self { pixels, label }
    }

    /// Human readable class name, if the label is in range.
    pub fn class_name(&self) -> Option<&'static str> {
        CIFAR10_CLASSES.get(self.label as usize).copied()
    }
}
