// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case wires the lower layers together for one
// command. No tensor math and no file formats live here, only
// workflow coordination.

/// Load → split → train with early stopping
pub mod train_use_case;

/// Score the best checkpoint on a held-out archive
pub mod evaluate_use_case;

/// Anchored window → C header or smaller archive
pub mod extract_use_case;

/// Archive summary
pub mod inspect_use_case;
