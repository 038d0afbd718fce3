// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer: sample
// matrices and labels, the data error taxonomy, the binary
// classification metrics and the seams between layers.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Metrics are pure functions of label slices

/// Matrix / sample / sub-sample types and the storage orientation
pub mod sample;

/// Typed errors raised by the data core
pub mod error;

/// Confusion matrix and precision / recall / F1 / FPR
pub mod metrics;

/// SampleSource and ArchiveSource abstractions
pub mod traits;
