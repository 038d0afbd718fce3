// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Decodes an archive and summarises it: shape, label presence,
// per-class counts and where the first seizure sample sits.

use anyhow::Result;

use crate::data::{loader::ArchiveFile, store::SampleStore, window::find_anchor};
use crate::domain::traits::{ArchiveSource, SampleSource};

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSummary {
    pub count:        usize,
    pub channel_dim:  usize,
    pub time_dim:     usize,
    pub has_labels:   bool,
    pub label_counts: Vec<(i32, usize)>,
    pub first_anchor: Option<usize>,
}

pub struct InspectUseCase {
    data_file: String,
}

impl InspectUseCase {
    pub fn new(data_file: String) -> Self {
        Self { data_file }
    }

    pub fn summarize(&self) -> Result<ArchiveSummary> {
        let store = SampleStore::from_archive(ArchiveFile::new(&self.data_file).load()?);
        Ok(ArchiveSummary {
            count:        store.count(),
            channel_dim:  store.channel_dim(),
            time_dim:     store.time_dim(),
            has_labels:   store.has_labels(),
            label_counts: store.label_counts(),
            first_anchor: find_anchor(&store).ok(),
        })
    }

    pub fn execute(&self) -> Result<()> {
        let s = self.summarize()?;
        println!(
            "numArrays: {}, dim1: {}, dim2: {}, labelsPresent: {}",
            s.count, s.channel_dim, s.time_dim, i32::from(s.has_labels)
        );
        for (label, n) in &s.label_counts {
            println!("  label {label:>2}: {n}");
        }
        match s.first_anchor {
            Some(i) => println!("First sample with label 1 at index {i}"),
            None => println!("No sample with label 1"),
        }
        Ok(())
    }
}
