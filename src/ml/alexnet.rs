use anyhow::Result;
use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig2d, Relu,
    },
    prelude::*,
};

use crate::ml::classifier::Classifier;

/// (kernel, stride, padding) of every convolution, in order.
const CONV_GEOMETRY: [(usize, usize, usize); 5] = [(11, 4, 0), (5, 1, 2), (3, 1, 1), (3, 1, 1), (3, 1, 1)];

/// Convolutions followed by a 3×3 / stride 2 max pool.
const POOLED: [bool; 5] = [true, true, false, false, true];

const POOL_KERNEL: usize = 3;
const POOL_STRIDE: usize = 2;

#[derive(Config, Debug)]
pub struct AlexNetConfig {
    pub num_classes: usize,
    /// Side of the square input images
    #[config(default = 227)]
    pub image_size:  usize,
    /// Output channels of the five convolutions
    #[config(default = "vec![96, 256, 384, 384, 256]")]
    pub channels:    Vec<usize>,
    /// Width of the two hidden fully connected layers
    #[config(default = 4096)]
    pub hidden:      usize,
    #[config(default = 0.5)]
    pub dropout:     f64,
}

/// Output side of a convolution or pooling window, if the input fits.
fn window_out(size: usize, kernel: usize, stride: usize, padding: usize) -> Option<usize> {
    let padded = size + 2 * padding;
    (padded >= kernel).then(|| (padded - kernel) / stride + 1)
}

impl AlexNetConfig {
    /// Side of the last feature map, or `None` if `image_size` is too
    /// small to survive the convolution stack.
    pub fn feature_side(&self) -> Option<usize> {
        let mut side = self.image_size;
        for (&(kernel, stride, padding), &pooled) in CONV_GEOMETRY.iter().zip(POOLED.iter()) {
            side = window_out(side, kernel, stride, padding)?;
            if pooled {
                side = window_out(side, POOL_KERNEL, POOL_STRIDE, 0)?;
            }
        }
        (side > 0).then_some(side)
    }

    /// Length of the flattened feature vector fed to the classifier head.
    /// 9216 for the standard 227×227 input.
    pub fn flattened_features(&self) -> Option<usize> {
        let side = self.feature_side()?;
        Some(self.channels.last()? * side * side)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<AlexNet<B>> {
        anyhow::ensure!(
            self.channels.len() == CONV_GEOMETRY.len(),
            "AlexNet needs {} convolution widths, got {}",
            CONV_GEOMETRY.len(),
            self.channels.len()
        );
        let features_len = self.flattened_features().ok_or_else(|| {
            anyhow::anyhow!("image size {} is too small for AlexNet", self.image_size)
        })?;

        let mut in_channels = 3;
        let mut features = Vec::with_capacity(CONV_GEOMETRY.len());
        for ((&(kernel, stride, padding), &pooled), &out_channels) in
            CONV_GEOMETRY.iter().zip(POOLED.iter()).zip(self.channels.iter())
        {
            let conv = Conv2dConfig::new([in_channels, out_channels], [kernel, kernel])
                .with_stride([stride, stride])
                .with_padding(PaddingConfig2d::Explicit(padding, padding))
                .init(device);
            let pool = pooled.then(|| {
                MaxPool2dConfig::new([POOL_KERNEL, POOL_KERNEL])
                    .with_strides([POOL_STRIDE, POOL_STRIDE])
                    .init()
            });
            features.push(ConvBlock { conv, activation: Relu::new(), pool });
            in_channels = out_channels;
        }

        Ok(AlexNet {
            features,
            dropout:    DropoutConfig::new(self.dropout).init(),
            fc1:        LinearConfig::new(features_len, self.hidden).init(device),
            fc2:        LinearConfig::new(self.hidden, self.hidden).init(device),
            head:       LinearConfig::new(self.hidden, self.num_classes).init(device),
            activation: Relu::new(),
        })
    }
}

/// Convolution → ReLU → optional max pool.
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    pub conv:       Conv2d<B>,
    pub activation: Relu,
    pub pool:       Option<MaxPool2d>,
}

impl<B: Backend> ConvBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.activation.forward(self.conv.forward(x));
        match &self.pool {
            Some(pool) => pool.forward(x),
            None       => x,
        }
    }
}

#[derive(Module, Debug)]
pub struct AlexNet<B: Backend> {
    pub features:   Vec<ConvBlock<B>>,
    pub dropout:    Dropout,
    pub fc1:        Linear<B>,
    pub fc2:        Linear<B>,
    pub head:       Linear<B>,
    pub activation: Relu,
}

impl<B: Backend> AlexNet<B> {
    /// images: [batch, 3, H, W] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = images;
        for block in &self.features {
            x = block.forward(x);
        }
        let x = x.flatten::<2>(1, 3);

        let x = self.activation.forward(self.fc1.forward(self.dropout.forward(x)));
        let x = self.activation.forward(self.fc2.forward(self.dropout.forward(x)));
        self.head.forward(x)
    }
}

impl<B: Backend> Classifier<B> for AlexNet<B> {
    type Input = Tensor<B, 4>;

    fn logits(&self, input: Self::Input) -> Tensor<B, 2> {
        self.forward(input)
    }
}
