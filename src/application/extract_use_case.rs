// ============================================================
// Layer 2 — ExtractUseCase
// ============================================================
// Cuts the anchored window out of an archive and writes it as
// either a firmware C header (per-time-position rows) or a new,
// smaller archive of whole samples.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::data::{
    loader::{write_archive, ArchiveFile},
    store::SampleStore,
    window::{self, ExtractConfig},
};
use crate::domain::traits::ArchiveSource;
use crate::infra::header_writer::write_header;

/// What the extracted window becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutput {
    Header,
    Archive,
}

pub struct ExtractUseCase {
    data_file: String,
    output:    PathBuf,
    format:    ExtractOutput,
    config:    ExtractConfig,
}

impl ExtractUseCase {
    pub fn new(data_file: String, output: PathBuf, format: ExtractOutput, config: ExtractConfig) -> Self {
        Self { data_file, output, format, config }
    }

    /// Returns the number of rows (header) or samples (archive) written.
    pub fn execute(&self) -> Result<usize> {
        let store = SampleStore::from_archive(ArchiveFile::new(&self.data_file).load()?);

        match self.format {
            ExtractOutput::Header => {
                let rows = window::extract(&store, &self.config)?;
                if rows.is_empty() {
                    tracing::warn!("Sub-sample budget is 0; the header table will be empty");
                }
                write_header(&self.output, &rows, self.config.channel_dim)?;
                Ok(rows.len())
            }
            ExtractOutput::Archive => {
                let win = window::locate(&store, &self.config)?;
                tracing::info!(
                    "First sample with label 1 at index {}; taking samples {}..{}",
                    win.anchor, win.start, win.end
                );
                if win.is_empty() {
                    bail!("sub-sample budget of 0 leaves no samples to write");
                }
                let archive = window::window_archive(&store, &win)?;
                write_archive(&self.output, &archive)?;
                Ok(archive.count())
            }
        }
    }
}
