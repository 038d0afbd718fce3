// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model, optimiser and tensor-math code lives here.
//
//   model.rs          — SeizureNet: three conv/batch-norm/pool
//                       blocks and a 1-D conv head emitting two
//                       logits per output position
//
//   early_stopping.rs — F1-driven patience counter deciding when
//                       to checkpoint and when to stop
//
//   trainer.rs        — Adam training loop with per-epoch
//                       shuffling, validation and checkpointing
//
//   evaluator.rs      — Ordered prediction over a store, metric
//                       computation, logits log and Inferencer

/// Convolutional classifier
pub mod model;

/// Patience-based stopping rule
pub mod early_stopping;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Prediction, scoring and checkpoint-backed inference
pub mod evaluator;
