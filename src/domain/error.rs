// ============================================================
// Layer 3 — Data Error Taxonomy
// ============================================================
// Every failure the archive codec, sample store and window
// extractor can raise. These are data-integrity or
// configuration defects, never transient, so nothing here
// is retried. Upper layers wrap them in anyhow with context.

use thiserror::Error;

/// Errors raised by the data core (codec, store, extractor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Fewer than 16 bytes were available for the header
    #[error("archive header truncated: got {got} bytes, need 16")]
    TruncatedHeader {
        /// Bytes actually present
        got: usize,
    },

    /// The sample or label payload ended early
    #[error("archive {section} payload truncated: got {got} bytes, need {need}")]
    TruncatedPayload {
        /// "sample" or "label"
        section: &'static str,
        got: usize,
        need: usize,
    },

    /// Header fields outside their legal range
    #[error("invalid archive header: {reason}")]
    InvalidHeader { reason: String },

    /// Bytes left over after the declared payload
    #[error("archive has {extra} trailing bytes after the declared payload")]
    TrailingBytes { extra: usize },

    /// Encoding was asked to write zero samples
    #[error("cannot encode an archive with no samples")]
    EmptyArchive,

    /// Inconsistent shapes or lengths at encode time
    #[error("shape mismatch: {reason}")]
    ShapeMismatch { reason: String },

    /// A decoded archive does not match what a consumer expects
    #[error("dimension mismatch: {field} expected {expected}, got {got}")]
    DimensionMismatch {
        field: &'static str,
        expected: i64,
        got: i64,
    },

    /// No sample carries label 1
    #[error("no sample with label 1 found in {count} samples")]
    AnchorNotFound { count: usize },

    /// Index-based access outside `0..count`
    #[error("sample index {index} out of range for {count} samples")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Result alias for the data core
pub type DataResult<T> = Result<T, DataError>;
