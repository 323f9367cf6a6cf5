// ============================================================
// Layer 5 — Training Loop
// ============================================================
// One train + validation loop shared by both networks.
//
// Per batch:   forward → cross-entropy → backward → optimiser step
// Per epoch:   mean training loss, then validation loss and
//              accuracy on model.valid() (dropout disabled,
//              no autodiff graph), then the epoch callback
//              (checkpointing + metrics CSV).
//
// Key Burn insight:
//   - Training runs on B (Autodiff<...>) so gradients exist
//   - model.valid() returns the same model on B::InnerBackend
//   - The validation loader must therefore produce batches on
//     B::InnerBackend too

use anyhow::Result;
use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::batcher::LabeledBatch;
use crate::infra::metrics::EpochMetrics;
use crate::ml::classifier::{count_correct, Classifier};

/// Batches a classifier `M` consumes on backend `B`.
pub type ClassifierLoader<'a, B, M> = &'a dyn DataLoader<LabeledBatch<B, <M as Classifier<B>>::Input>>;

#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub epochs:        usize,
    pub learning_rate: f64,
}

/// Loss and accuracy of one pass over a loader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Mean cross-entropy over batches (NaN if there were none)
    pub loss:    f64,
    pub correct: usize,
    pub total:   usize,
}

impl Evaluation {
    /// Fraction of samples classified correctly, over all samples.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Score `model` on every batch of `loader` without updating it.
pub fn evaluate<B, M>(model: &M, loader: ClassifierLoader<'_, B, M>) -> Evaluation
where
    B: Backend,
    M: Classifier<B>,
{
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut correct  = 0usize;
    let mut total    = 0usize;

    for batch in loader.iter() {
        let targets = batch.targets;
        let logits  = model.logits(batch.inputs);

        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss: f64 = ce.forward(logits.clone(), targets.clone()).into_scalar().elem::<f64>();

        loss_sum += loss;
        batches  += 1;
        total    += targets.dims()[0];
        correct  += count_correct(logits, targets);
    }

    Evaluation {
        loss: if batches > 0 { loss_sum / batches as f64 } else { f64::NAN },
        correct,
        total,
    }
}

/// Train `model` for `opts.epochs` epochs and return the trained model.
///
/// `on_epoch` runs after validation with the autodiff model and that
/// epoch's metrics; an error from it aborts training.
pub fn fit<B, M, O, F>(
    mut model:    M,
    mut optim:    O,
    opts:         &FitOptions,
    train_loader: ClassifierLoader<'_, B, M>,
    valid_loader: ClassifierLoader<'_, B::InnerBackend, M::InnerModule>,
    mut on_epoch: F,
) -> Result<M>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Classifier<B>,
    M::InnerModule: Classifier<B::InnerBackend>,
    O: Optimizer<M, B>,
    F: FnMut(&M, &EpochMetrics) -> Result<()>,
{
    tracing::info!(
        "Training for {} epochs ({} training samples, {} parameters)",
        opts.epochs,
        train_loader.num_items(),
        model.num_params()
    );

    for epoch in 1..=opts.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let logits = model.logits(batch.inputs);
            let ce     = CrossEntropyLossConfig::new().init(&logits.device());
            let loss   = ce.forward(logits, batch.targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            // Backward pass + optimiser update
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(opts.learning_rate, model, grads);
        }

        let train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        let valid = evaluate(&model.valid(), valid_loader);

        let metrics = EpochMetrics::new(epoch, train_loss, valid.loss, valid.accuracy());
        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | valid_loss={:.4} | valid_acc={:.2}%",
            epoch,
            opts.epochs,
            metrics.train_loss,
            metrics.valid_loss,
            metrics.valid_accuracy * 100.0,
        );

        on_epoch(&model, &metrics)?;
    }

    tracing::info!("Training complete!");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
        data::dataloader::DataLoaderBuilder,
        optim::AdamConfig,
    };

    use crate::data::{
        batcher::SentimentBatcher,
        dataset::{EncodedTweet, SentimentDataset},
    };
    use crate::domain::sentiment::Sentiment;
    use crate::ml::lstm::{SentimentLstm, SentimentLstmConfig};

    type TrainBackend = Autodiff<NdArray>;

    fn samples() -> Vec<EncodedTweet> {
        (0..12)
            .map(|i| {
                let label = Sentiment::from_index(i % 3).unwrap();
                EncodedTweet::new(vec![1, 3 + label.index() as u32, 2, 0], label)
            })
            .collect()
    }

    #[test]
    fn test_evaluation_accuracy() {
        let e = Evaluation { loss: 1.0, correct: 3, total: 4 };
        assert!((e.accuracy() - 0.75).abs() < 1e-12);
        let empty = Evaluation { loss: f64::NAN, correct: 0, total: 0 };
        assert_eq!(empty.accuracy(), 0.0);
    }

    #[test]
    fn test_fit_reports_every_epoch() {
        let device = NdArrayDevice::default();
        let model: SentimentLstm<TrainBackend> = SentimentLstmConfig::new(6)
            .with_embedding_dim(4)
            .with_hidden_dim(4)
            .init(&device);

        let train_loader = DataLoaderBuilder::new(SentimentBatcher::<TrainBackend>::new(device))
            .batch_size(4)
            .shuffle(1)
            .build(SentimentDataset::new(samples()));
        let valid_loader = DataLoaderBuilder::new(SentimentBatcher::<NdArray>::new(device))
            .batch_size(5)
            .build(SentimentDataset::new(samples()));

        let mut seen = Vec::new();
        let trained = fit(
            model,
            AdamConfig::new().init(),
            &FitOptions { epochs: 3, learning_rate: 1e-2 },
            train_loader.as_ref(),
            valid_loader.as_ref(),
            |_, m| {
                seen.push(*m);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen.iter().map(|m| m.epoch).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(seen.iter().all(|m| m.train_loss.is_finite() && m.valid_loss.is_finite()));

        let eval = evaluate(&trained.valid(), valid_loader.as_ref());
        assert_eq!(eval.total, 12);
        assert!(eval.correct <= 12);
    }

    #[test]
    fn test_epoch_callback_error_aborts() {
        let device = NdArrayDevice::default();
        let model: SentimentLstm<TrainBackend> = SentimentLstmConfig::new(6).init(&device);
        let loader = DataLoaderBuilder::new(SentimentBatcher::<TrainBackend>::new(device))
            .batch_size(4)
            .build(SentimentDataset::new(samples()));
        let valid = DataLoaderBuilder::new(SentimentBatcher::<NdArray>::new(device))
            .batch_size(4)
            .build(SentimentDataset::new(samples()));

        let result = fit(
            model,
            AdamConfig::new().init(),
            &FitOptions { epochs: 5, learning_rate: 1e-3 },
            loader.as_ref(),
            valid.as_ref(),
            |_, _| anyhow::bail!("disk full"),
        );
        assert!(result.is_err());
    }
}
