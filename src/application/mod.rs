// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training a network or classifying a tweet).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - No direct file format handling (that's Layer 4 and 6)
//   - Only workflow coordination

// AlexNet on CIFAR-10
pub mod image_use_case;

// LSTM on labelled tweets
pub mod sentiment_use_case;

// Scoring new tweets with a trained LSTM
pub mod classify_use_case;
