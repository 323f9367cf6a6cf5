// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by both pipelines:
//
//   checkpoint.rs — Saving and loading model weights
//                   (Burn's CompactRecorder) plus the JSON
//                   side files: training config, vocabulary,
//                   latest-epoch pointer.
//
//   metrics.rs    — Training metrics logging
//                   Appends epoch-level loss and accuracy to
//                   a CSV file for later plotting.

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
