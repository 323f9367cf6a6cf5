// ============================================================
// Layer 2 — ImageTrainUseCase
// ============================================================
// Orchestrates the AlexNet / CIFAR-10 pipeline in order:
//
//   Step 1: Load the CIFAR-10 training batches   (Layer 4 - data)
//   Step 2: Seeded train/validation split        (Layer 4 - data)
//   Step 3: Build the model                      (Layer 5 - ml)
//   Step 4: Save config                          (Layer 6 - infra)
//   Step 5: Build data loaders                   (Layer 4 - data)
//   Step 6: Train with SGD + momentum            (Layer 5 - ml)
//   Step 7: Evaluate on the test batch, if any   (Layer 5 - ml)

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, momentum::MomentumConfig, SgdConfig},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::data::{
    augment::Augmenter,
    batcher::ImageBatcher,
    cifar::{CifarLoader, CifarSplit},
    dataset::ImageDataset,
    splitter::split_train_val,
};
use crate::domain::{image::CIFAR10_CLASSES, traits::RecordSource};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    alexnet::AlexNetConfig,
    cpu_device, gpu_device,
    trainer::{evaluate, fit, Evaluation, FitOptions},
    BackendKind, CpuBackend, GpuBackend,
};

/// File name prefix for everything this pipeline writes.
pub const IMAGE_PREFIX: &str = "alexnet";

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTrainConfig {
    pub data_dir:       String,
    pub checkpoint_dir: String,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub learning_rate:  f64,
    pub momentum:       f64,
    pub weight_decay:   f64,
    pub image_size:     usize,
    pub conv_channels:  Vec<usize>,
    pub hidden_units:   usize,
    pub dropout:        f64,
    pub valid_fraction: f64,
    pub seed:           u64,
    pub augment:        bool,
    pub num_workers:    usize,
    pub backend:        BackendKind,
}

impl Default for ImageTrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       "data/cifar-10-batches-bin".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            epochs:         2,
            batch_size:     64,
            learning_rate:  0.005,
            momentum:       0.9,
            weight_decay:   0.005,
            image_size:     227,
            conv_channels:  vec![96, 256, 384, 384, 256],
            hidden_units:   4096,
            dropout:        0.5,
            valid_fraction: 0.1,
            seed:           1,
            augment:        false,
            num_workers:    2,
            backend:        BackendKind::default(),
        }
    }
}

impl ImageTrainConfig {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.epochs > 0, "epochs must be positive");
        anyhow::ensure!(self.batch_size > 0, "batch size must be positive");
        anyhow::ensure!(
            (0.0..1.0).contains(&self.valid_fraction),
            "validation fraction must be in [0, 1), got {}",
            self.valid_fraction
        );
        Ok(())
    }

    pub fn model_config(&self) -> AlexNetConfig {
        AlexNetConfig::new(CIFAR10_CLASSES.len())
            .with_image_size(self.image_size)
            .with_channels(self.conv_channels.clone())
            .with_hidden(self.hidden_units)
            .with_dropout(self.dropout)
    }
}

/// Final numbers of an image training run.
#[derive(Debug, Clone, Copy)]
pub struct ImageTrainReport {
    pub valid: Evaluation,
    /// `None` when no test batch was found
    pub test:  Option<Evaluation>,
}

// ─── ImageTrainUseCase ───────────────────────────────────────────────────────
pub struct ImageTrainUseCase {
    config: ImageTrainConfig,
}

impl ImageTrainUseCase {
    pub fn new(config: ImageTrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline on the configured backend.
    pub fn execute(&self) -> Result<ImageTrainReport> {
        match self.config.backend {
            BackendKind::Ndarray => self.execute_on::<CpuBackend>(cpu_device()),
            BackendKind::Wgpu    => self.execute_on::<GpuBackend>(gpu_device()),
        }
    }

    pub fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<ImageTrainReport> {
        let cfg = &self.config;
        cfg.validate()?;
        B::seed(cfg.seed);
        tracing::info!("Training AlexNet on {:?} backend, device {:?}", cfg.backend, device);

        // ── Step 1: Load CIFAR-10 training images ─────────────────────────────
        let records = CifarLoader::new(&cfg.data_dir, CifarSplit::Train).load_all()?;

        // ── Step 2: Train / validation split ──────────────────────────────────
        let (train_records, valid_records) =
            split_train_val(records, 1.0 - cfg.valid_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_records.len(),
            valid_records.len()
        );

        // ── Step 3: Build model ───────────────────────────────────────────────
        let model_cfg = cfg.model_config();
        let model = model_cfg.init::<B>(&device)?;
        tracing::info!(
            "AlexNet ready: {}×{} input, {} flattened features",
            cfg.image_size,
            cfg.image_size,
            model_cfg.flattened_features().unwrap_or_default()
        );

        // ── Step 4: Save config for later reconstruction ──────────────────────
        let ckpt    = CheckpointManager::new(&cfg.checkpoint_dir, IMAGE_PREFIX)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir, IMAGE_PREFIX)?;
        ckpt.save_json("config.json", cfg)?;

        // ── Step 5: Data loaders ──────────────────────────────────────────────
        let mut train_batcher = ImageBatcher::<B>::new(device.clone(), cfg.image_size);
        if cfg.augment {
            train_batcher = train_batcher.with_augmenter(Augmenter::default(), cfg.seed);
        }
        let train_loader = DataLoaderBuilder::new(train_batcher)
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .num_workers(cfg.num_workers)
            .build(ImageDataset::new(train_records));

        let valid_loader = DataLoaderBuilder::new(ImageBatcher::<B::InnerBackend>::new(device.clone(), cfg.image_size))
            .batch_size(cfg.batch_size)
            .num_workers(cfg.num_workers)
            .build(ImageDataset::new(valid_records));

        // ── Step 6: SGD with momentum and weight decay ────────────────────────
        let optim = SgdConfig::new()
            .with_momentum(Some(MomentumConfig::new().with_momentum(cfg.momentum).with_dampening(0.0)))
            .with_weight_decay(Some(WeightDecayConfig::new(cfg.weight_decay as f32)))
            .init();

        let opts = FitOptions { epochs: cfg.epochs, learning_rate: cfg.learning_rate };
        let mut best_valid_loss = f64::INFINITY;

        let model = fit(
            model,
            optim,
            &opts,
            train_loader.as_ref(),
            valid_loader.as_ref(),
            |model, m| {
                ckpt.save_model(model, m.epoch)?;
                metrics.log(m)?;
                if m.is_improvement(best_valid_loss) {
                    best_valid_loss = m.valid_loss;
                    tracing::info!("Epoch {} is the best so far (valid_loss={:.4})", m.epoch, m.valid_loss);
                }
                Ok(())
            },
        )?;

        let model = model.valid();
        let valid = evaluate(&model, valid_loader.as_ref());

        // ── Step 7: Held-out test split ───────────────────────────────────────
        let test_source = CifarLoader::new(&cfg.data_dir, CifarSplit::Test);
        let test = if test_source.is_available() {
            let test_loader = DataLoaderBuilder::new(ImageBatcher::<B::InnerBackend>::new(device, cfg.image_size))
                .batch_size(cfg.batch_size)
                .num_workers(cfg.num_workers)
                .build(ImageDataset::new(test_source.load_all()?));
            let eval = evaluate(&model, test_loader.as_ref());
            println!(
                "Accuracy of the model on the {} test images: {:.2} %",
                eval.total,
                eval.accuracy() * 100.0
            );
            Some(eval)
        } else {
            tracing::warn!("No test batch in '{}', skipping test evaluation", cfg.data_dir);
            None
        };

        Ok(ImageTrainReport { valid, test })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cifar::tests::fake_batch;
    use std::fs;

    #[test]
    fn test_rejects_bad_valid_fraction() {
        let cfg = ImageTrainConfig { valid_fraction: 1.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_default_model_matches_classic_alexnet() {
        let cfg = ImageTrainConfig::default().model_config();
        assert_eq!(cfg.flattened_features(), Some(9216));
        assert_eq!(cfg.num_classes, 10);
    }

    #[test]
    fn test_tiny_end_to_end_run() {
        let data = tempfile::tempdir().unwrap();
        let ckpt = tempfile::tempdir().unwrap();
        let labels: Vec<u8> = (0..20).map(|i| (i % 10) as u8).collect();
        fs::write(data.path().join("data_batch_1.bin"), fake_batch(&labels)).unwrap();
        fs::write(data.path().join("test_batch.bin"), fake_batch(&[0, 1, 2, 3])).unwrap();

        let cfg = ImageTrainConfig {
            data_dir:       data.path().display().to_string(),
            checkpoint_dir: ckpt.path().display().to_string(),
            epochs:         1,
            batch_size:     4,
            image_size:     67,
            conv_channels:  vec![2, 4, 4, 4, 4],
            hidden_units:   8,
            num_workers:    1,
            augment:        true,
            backend:        BackendKind::Ndarray,
            ..Default::default()
        };

        let report = ImageTrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.valid.total, 2);
        assert_eq!(report.test.map(|t| t.total), Some(4));
        assert!(ckpt.path().join("alexnet_epoch_1.mpk").exists());
        assert!(ckpt.path().join("alexnet_config.json").exists());
        assert!(ckpt.path().join("alexnet_metrics.csv").exists());
    }
}
