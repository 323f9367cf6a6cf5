use burn::{
    nn::{
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
};

use crate::ml::classifier::Classifier;

#[derive(Config, Debug)]
pub struct SentimentLstmConfig {
    pub vocab_size:    usize,
    #[config(default = 64)]
    pub embedding_dim: usize,
    /// Size of the LSTM hidden and cell state
    #[config(default = 32)]
    pub hidden_dim:    usize,
    #[config(default = 0.2)]
    pub dropout:       f64,
    #[config(default = 3)]
    pub num_classes:   usize,
}

impl SentimentLstmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentLstm<B> {
        SentimentLstm {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device),
            lstm:      LstmConfig::new(self.embedding_dim, self.hidden_dim, true).init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
            head:      LinearConfig::new(self.hidden_dim, self.num_classes).init(device),
        }
    }
}

/// Embedding → LSTM → dropout → linear, scored at the last time step.
#[derive(Module, Debug)]
pub struct SentimentLstm<B: Backend> {
    pub embedding: Embedding<B>,
    pub lstm:      Lstm<B>,
    pub dropout:   Dropout,
    pub head:      Linear<B>,
}

impl<B: Backend> SentimentLstm<B> {
    /// token_ids: [batch, seq_len] → logits: [batch, num_classes]
    pub fn forward(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let embedded = self.embedding.forward(token_ids); // [batch, seq_len, embedding_dim]

        // No initial state: the LSTM starts from zero hidden and cell states.
        let (outputs, _state) = self.lstm.forward(embedded, None); // [batch, seq_len, hidden_dim]

        let [batch_size, seq_len, hidden_dim] = outputs.dims();
        let last = outputs
            .slice([0..batch_size, seq_len - 1..seq_len, 0..hidden_dim])
            .reshape([batch_size, hidden_dim]);

        self.head.forward(self.dropout.forward(last))
    }
}

impl<B: Backend> Classifier<B> for SentimentLstm<B> {
    type Input = Tensor<B, 2, Int>;

    fn logits(&self, input: Self::Input) -> Tensor<B, 2> {
        self.forward(input)
    }
}
