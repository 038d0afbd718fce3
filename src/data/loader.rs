// ============================================================
// Layer 4 — Archive File Loader
// ============================================================
// Whole-file reads and writes around the archive codec.
// A file is read into memory in one call and decoded; writes
// encode fully before touching the disk.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::data::archive::{self, Archive};
use crate::domain::traits::ArchiveSource;

/// An archive stored at a path on disk.
/// Implements the ArchiveSource trait from Layer 3.
pub struct ArchiveFile {
    path: PathBuf,
}

impl ArchiveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArchiveSource for ArchiveFile {
    fn load(&self) -> Result<Archive> {
        read_archive(&self.path)
    }
}

/// Read and decode the archive at `path`.
pub fn read_archive(path: impl AsRef<Path>) -> Result<Archive> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read archive '{}'", path.display()))?;

    let archive = archive::decode(&bytes)
        .with_context(|| format!("Corrupt archive '{}'", path.display()))?;

    tracing::info!(
        "Loaded '{}': {} samples of {}x{}, labels {}",
        path.display(),
        archive.count(),
        archive.channel_dim,
        archive.time_dim,
        if archive.labels.is_some() { "present" } else { "absent" },
    );
    Ok(archive)
}

/// Encode `archive` and write it to `path`, creating parent directories.
pub fn write_archive(path: impl AsRef<Path>, archive: &Archive) -> Result<()> {
    let path = path.as_ref();
    let bytes = archive.encode()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    fs::write(path, &bytes)
        .with_context(|| format!("Cannot write archive '{}'", path.display()))?;

    tracing::info!("Wrote {} samples ({} bytes) to '{}'", archive.count(), bytes.len(), path.display());
    Ok(())
}
