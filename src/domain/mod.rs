// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing what the two pipelines work on:
// labelled images, labelled tweets, and the sentiment classes.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// A CIFAR-10 image with its class label
pub mod image;

// The three sentiment classes and a raw tweet record
pub mod sentiment;

// Core abstractions (traits) that other layers implement
pub mod traits;
