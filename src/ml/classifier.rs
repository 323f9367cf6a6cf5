use burn::prelude::*;

/// A model that maps a batch of inputs to one score per class.
///
/// Both networks implement this so one training loop and one
/// evaluation routine serve the image and the text pipeline.
pub trait Classifier<B: Backend> {
    /// What one batch of inputs looks like, e.g. `Tensor<B, 4>` for images.
    type Input: Send + 'static;

    /// input batch → logits: [batch, num_classes]
    fn logits(&self, input: Self::Input) -> Tensor<B, 2>;
}

/// Number of rows whose highest logit matches the target class.
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns shape [batch, 1]; flatten to [batch]
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted.equal(targets).int().sum().into_scalar().elem::<i64>();
    correct as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    #[test]
    fn test_count_correct() {
        let device = NdArrayDevice::default();
        let logits = Tensor::<NdArray, 2>::from_data(
            TensorData::new(vec![0.1f32, 0.9, 0.0, 2.0, 1.0, 0.5, 0.2, 0.3, 0.4], [3, 3]),
            &device,
        );
        let targets = Tensor::<NdArray, 1, Int>::from_data(
            TensorData::new(vec![1i64, 2, 2], [3]).convert::<i64>(),
            &device,
        );
        // Row 0 predicts 1 (right), row 1 predicts 0 (wrong), row 2 predicts 2 (right).
        assert_eq!(count_correct(logits, targets), 2);
    }
}
