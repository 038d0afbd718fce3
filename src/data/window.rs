// ============================================================
// Layer 4 — Anchored Window Extractor
// ============================================================
// Finds the first seizure-labelled sample (the anchor), backs
// up `pre_roll` samples, and takes just enough whole samples to
// cover `max_sub_samples` time positions. The result is either
// a table of per-time-position rows for firmware embedding or a
// new archive holding the selected samples.
//
//   index:   0 1 2 3 4 5 6 7 8 9 ...
//   label:   0 0 0 0 0 0 0 1 1 0 ...
//                      ^     ^
//                  start     anchor   (pre_roll = 2)
//
// Sub-rows are the columns of each sample in the canonical
// channel-major layout (see domain::sample).

use serde::{Deserialize, Serialize};

use crate::data::archive::Archive;
use crate::domain::error::{DataError, DataResult};
use crate::domain::sample::{SubSample, POSITIVE_LABEL};
use crate::domain::traits::SampleSource;

/// Shape the consumer expects and how much to take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub channel_dim:     usize,
    pub time_dim:        usize,
    /// Whole samples kept before the anchor
    pub pre_roll:        usize,
    /// Upper bound on emitted sub-rows
    pub max_sub_samples: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            channel_dim:     18,
            time_dim:        1024,
            pre_roll:        5,
            max_sub_samples: 8192,
        }
    }
}

/// Half-open range `[start, end)` of sample indices. A pure view
/// until materialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub anchor: usize,
    pub start:  usize,
    pub end:    usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Check that `source` has exactly the expected shape and carries labels.
pub fn validate_shape<S: SampleSource>(source: &S, cfg: &ExtractConfig) -> DataResult<()> {
    if source.channel_dim() != cfg.channel_dim {
        return Err(DataError::DimensionMismatch {
            field:    "channel_dim",
            expected: cfg.channel_dim as i64,
            got:      source.channel_dim() as i64,
        });
    }
    if source.time_dim() != cfg.time_dim {
        return Err(DataError::DimensionMismatch {
            field:    "time_dim",
            expected: cfg.time_dim as i64,
            got:      source.time_dim() as i64,
        });
    }
    if !source.has_labels() {
        return Err(DataError::DimensionMismatch {
            field:    "labels_present",
            expected: 1,
            got:      0,
        });
    }
    Ok(())
}

/// Index of the first sample labelled 1.
pub fn find_anchor<S: SampleSource>(source: &S) -> DataResult<usize> {
    for i in 0..source.count() {
        if source.label(i)? == POSITIVE_LABEL {
            return Ok(i);
        }
    }
    Err(DataError::AnchorNotFound { count: source.count() })
}

/// Validate, locate the anchor, and size the window.
pub fn locate<S: SampleSource>(source: &S, cfg: &ExtractConfig) -> DataResult<Window> {
    validate_shape(source, cfg)?;
    let anchor = find_anchor(source)?;

    let start = anchor.saturating_sub(cfg.pre_roll);
    let needed = cfg.max_sub_samples.div_ceil(cfg.time_dim);
    let end = start.saturating_add(needed).min(source.count());

    tracing::debug!(
        "Window anchor={} start={} end={} ({} samples needed)",
        anchor, start, end, needed
    );
    Ok(Window { anchor, start, end })
}

/// Emit one sub-row per time position of every sample in `window`,
/// stopping once `max_sub_samples` rows exist.
pub fn sub_samples<S: SampleSource>(
    source: &S,
    window: &Window,
    max_sub_samples: usize,
) -> DataResult<Vec<SubSample>> {
    let per_sample = source.time_dim();
    let total = max_sub_samples.min(window.len().saturating_mul(per_sample));
    let mut rows = Vec::with_capacity(total);

    'samples: for idx in window.start..window.end {
        let sample = source.sample(idx)?;
        for t in 0..per_sample {
            if rows.len() >= max_sub_samples {
                break 'samples;
            }
            rows.push(SubSample { channels: sample.column(t), label: sample.label });
        }
    }
    Ok(rows)
}

/// Copy the whole samples in `window` into a new archive.
pub fn window_archive<S: SampleSource>(source: &S, window: &Window) -> DataResult<Archive> {
    let mut samples = Vec::with_capacity(window.len());
    let mut labels = Vec::with_capacity(window.len());
    for idx in window.start..window.end {
        let s = source.sample(idx)?;
        samples.push(s.to_matrix());
        labels.push(s.label);
    }
    Archive::new(samples, Some(labels))
}

/// Full extraction: validate, anchor, window, and flatten to sub-rows.
pub fn extract<S: SampleSource>(source: &S, cfg: &ExtractConfig) -> DataResult<Vec<SubSample>> {
    let window = locate(source, cfg)?;
    let rows = sub_samples(source, &window, cfg.max_sub_samples)?;
    tracing::info!(
        "Collected {} sub-samples from samples {}..{} (anchor {})",
        rows.len(), window.start, window.end, window.anchor
    );
    Ok(rows)
}
