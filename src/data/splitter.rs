// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles sample indices and cuts them into a training part
// and a validation part. The training size is
// floor(n * train_fraction); the rest goes to validation.
//
// Works on indices so the (large) sample buffer is only copied
// once, into the two resulting stores.

use rand::{seq::SliceRandom, Rng};

use crate::data::store::SampleStore;
use crate::domain::error::DataResult;

/// Shuffle `0..total` and split into (train, validation) index lists.
pub fn split_indices<R: Rng + ?Sized>(
    total:          usize,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..total).collect();
    indices.shuffle(rng);

    let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).floor() as usize;
    let split_at = split_at.min(total);
    let val = indices.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        indices.len(),
        val.len(),
    );
    (indices, val)
}

/// Split a store into two independent stores.
pub fn split_store<R: Rng + ?Sized>(
    store:          &SampleStore,
    train_fraction: f64,
    rng:            &mut R,
) -> DataResult<(SampleStore, SampleStore)> {
    let (train_idx, val_idx) = split_indices(store.len(), train_fraction, rng);
    Ok((store.select(&train_idx)?, store.select(&val_idx)?))
}
