// ============================================================
// Layer 3 — Core Traits
// ============================================================
// Seams between layers. The window extractor and the batcher
// only need indexed, shape-aware access to samples, so they are
// written against SampleSource rather than a concrete store.
// Archives reach the application layer through ArchiveSource.

use anyhow::Result;

use crate::data::archive::Archive;
use crate::domain::error::DataResult;
use crate::domain::sample::SampleRef;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Read-only, indexed access to equal-shape labelled samples.
///
/// Implementations:
///   - SampleStore → view over one decoded archive
pub trait SampleSource {
    fn channel_dim(&self) -> usize;

    fn time_dim(&self) -> usize;

    /// Number of samples
    fn count(&self) -> usize;

    /// Whether the archive this came from carried labels.
    /// When false every label reads as `UNLABELED`.
    fn has_labels(&self) -> bool;

    /// Sample at `index`, or `IndexOutOfRange`.
    fn sample(&self, index: usize) -> DataResult<SampleRef<'_>>;

    /// Label at `index`, or `IndexOutOfRange`.
    fn label(&self, index: usize) -> DataResult<i32> {
        self.sample(index).map(|s| s.label)
    }
}

// ─── ArchiveSource ────────────────────────────────────────────────────────────
/// Anything that can produce a decoded archive.
///
/// Implementations:
///   - ArchiveFile → reads and decodes a file on disk
pub trait ArchiveSource {
    fn load(&self) -> Result<Archive>;
}
