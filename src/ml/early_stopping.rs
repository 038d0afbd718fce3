// ============================================================
// Layer 5 — Early Stopping
// ============================================================
// Patience-based stopping over validation F1, written as a fold:
// each epoch's F1 goes in, a decision comes out.
//
// Per epoch, in this order:
//   1. f1 > best        → best = f1, remaining = patience
//   2. remaining -= 1   (always)
//   3. f1 == best       → checkpoint
//   4. remaining == 0   → stop
//
// Step 3 is an equality test after the update, so the epoch that
// sets a new best checkpoints, and so does any later epoch that
// ties it exactly. An epoch below the best never checkpoints.

/// What the training loop should do after an epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochDecision {
    pub improved:   bool,
    pub checkpoint: bool,
    pub stop:       bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyStopping {
    patience:  usize,
    best_f1:   f64,
    remaining: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best_f1: 0.0, remaining: patience }
    }

    pub fn best_f1(&self) -> f64 {
        self.best_f1
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Fold one epoch's validation F1 into the state.
    pub fn observe(&mut self, f1: f64) -> EpochDecision {
        let improved = f1 > self.best_f1;
        if improved {
            self.best_f1 = f1;
            self.remaining = self.patience;
        }
        self.remaining = self.remaining.saturating_sub(1);

        EpochDecision {
            improved,
            checkpoint: f1 == self.best_f1,
            stop: self.remaining == 0,
        }
    }
}
