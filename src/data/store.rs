// ============================================================
// Layer 4 — Sample Store
// ============================================================
// Read-only indexed view over one decoded archive. Sample
// values are kept in a single contiguous buffer so a sample is
// just a slice; labels sit in a parallel Vec (filled with
// UNLABELED when the archive had none).
//
// The store is never mutated after construction, so it can be
// shared by reference with any number of readers.

use crate::data::archive::Archive;
use crate::domain::error::{DataError, DataResult};
use crate::domain::sample::{SampleRef, UNLABELED};
use crate::domain::traits::SampleSource;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleStore {
    channel_dim: usize,
    time_dim:    usize,
    values:      Vec<f32>,
    labels:      Vec<i32>,
    has_labels:  bool,
}

impl SampleStore {
    /// Take ownership of a decoded archive.
    pub fn from_archive(archive: Archive) -> Self {
        let count = archive.count();
        let has_labels = archive.labels.is_some();
        let labels = archive.labels.unwrap_or_else(|| vec![UNLABELED; count]);

        let mut values = Vec::with_capacity(count * archive.channel_dim * archive.time_dim);
        for m in archive.samples {
            values.extend_from_slice(&m.values);
        }

        Self {
            channel_dim: archive.channel_dim,
            time_dim: archive.time_dim,
            values,
            labels,
            has_labels,
        }
    }

    fn sample_len(&self) -> usize {
        self.channel_dim * self.time_dim
    }

    /// Sample `index` in archive order.
    pub fn get(&self, index: usize) -> DataResult<SampleRef<'_>> {
        let count = self.labels.len();
        if index >= count {
            return Err(DataError::IndexOutOfRange { index, count });
        }
        let len = self.sample_len();
        Ok(SampleRef {
            values:      &self.values[index * len..(index + 1) * len],
            label:       self.labels[index],
            channel_dim: self.channel_dim,
            time_dim:    self.time_dim,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Every sample in archive order. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = SampleRef<'_>> + '_ {
        let len = self.sample_len();
        self.values
            .chunks_exact(len.max(1))
            .zip(&self.labels)
            .map(move |(values, &label)| SampleRef {
                values,
                label,
                channel_dim: self.channel_dim,
                time_dim: self.time_dim,
            })
    }

    /// Samples in the order given by `order` (normally a permutation
    /// of `0..len`). An out-of-range entry yields `IndexOutOfRange`.
    pub fn permuted<'a>(
        &'a self,
        order: &'a [usize],
    ) -> impl Iterator<Item = DataResult<SampleRef<'a>>> + 'a {
        order.iter().map(move |&i| self.get(i))
    }

    /// Copy the samples at `indices` (in that order) into a new store.
    pub fn select(&self, indices: &[usize]) -> DataResult<SampleStore> {
        let mut values = Vec::with_capacity(indices.len() * self.sample_len());
        let mut labels = Vec::with_capacity(indices.len());
        for &i in indices {
            let s = self.get(i)?;
            values.extend_from_slice(s.values);
            labels.push(s.label);
        }
        Ok(SampleStore {
            channel_dim: self.channel_dim,
            time_dim: self.time_dim,
            values,
            labels,
            has_labels: self.has_labels,
        })
    }

    /// Number of samples per label value, sorted by label
    pub fn label_counts(&self) -> Vec<(i32, usize)> {
        let mut counts = std::collections::BTreeMap::new();
        for &l in &self.labels {
            *counts.entry(l).or_insert(0usize) += 1;
        }
        counts.into_iter().collect()
    }
}

impl SampleSource for SampleStore {
    fn channel_dim(&self) -> usize {
        self.channel_dim
    }

    fn time_dim(&self) -> usize {
        self.time_dim
    }

    fn count(&self) -> usize {
        self.labels.len()
    }

    fn has_labels(&self) -> bool {
        self.has_labels
    }

    fn sample(&self, index: usize) -> DataResult<SampleRef<'_>> {
        self.get(index)
    }
}
