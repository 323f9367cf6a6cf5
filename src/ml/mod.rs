// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Everything that builds, trains or runs a network lives here.
//
//   alexnet.rs    — AlexNet: five convolutions, three fully
//                   connected layers, sized from the input
//   lstm.rs       — Embedding → LSTM → linear sentiment model
//   classifier.rs — the Classifier trait both models implement
//   trainer.rs    — the shared train/validate loop
//
// Backends:
//   ndarray — CPU, always available
//   wgpu    — GPU through WebGPU

use burn::backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu};
use serde::{Deserialize, Serialize};

/// AlexNet architecture and configuration
pub mod alexnet;

/// LSTM sentiment classifier
pub mod lstm;

/// Classifier trait and accuracy helpers
pub mod classifier;

/// Training loop with per-epoch validation
pub mod trainer;

/// CPU training backend
pub type CpuBackend = Autodiff<NdArray>;

/// GPU training backend
pub type GpuBackend = Autodiff<Wgpu>;

/// Which tensor backend a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Ndarray,
    #[default]
    Wgpu,
}

pub fn cpu_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

pub fn gpu_device() -> WgpuDevice {
    WgpuDevice::default()
}
