// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by the ML and application
// layers:
//
//   checkpoint.rs    — Best-model and optimizer records
//                      (full-precision MessagePack), the
//                      best-epoch marker and the TrainConfig
//                      JSON needed to rebuild the model.
//
//   metrics.rs       — Per-epoch CSV log (loss, F1, precision,
//                      recall, FPR, whether it checkpointed).
//
//   header_writer.rs — C header rendering of extracted
//                      sub-samples for firmware tests.

/// Model and optimizer checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Firmware C header output
pub mod header_writer;
