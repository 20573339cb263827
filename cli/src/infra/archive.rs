//! Infrastructure implementation of the `Unarchiver` port.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::Unarchiver;

/// Archive formats the extractor understands, chosen by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the archive's file name.
    ///
    /// # Errors
    ///
    /// Returns an error for any extension other than `.zip`, `.tar.gz` or
    /// `.tgz`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".zip") {
            Ok(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else {
            anyhow::bail!("unsupported archive format: {}", path.display())
        }
    }
}

/// Extracts zip and gzipped tar archives on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

impl Unarchiver for ArchiveExtractor {
    async fn unarchive(&self, archive: &Path, dest: &Path) -> Result<()> {
        let format = ArchiveFormat::from_path(archive)?;
        let archive: PathBuf = archive.to_path_buf();
        let dest: PathBuf = dest.to_path_buf();
        tracing::debug!(archive = %archive.display(), dest = %dest.display(), ?format, "extracting");
        tokio::task::spawn_blocking(move || extract(format, &archive, &dest))
            .await
            .context("extract task panicked")?
    }
}

fn extract(format: ArchiveFormat, archive: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;
    let file = File::open(archive).with_context(|| format!("opening {}", archive.display()))?;
    match format {
        ArchiveFormat::Zip => {
            let mut zip = zip::ZipArchive::new(file)
                .with_context(|| format!("reading {}", archive.display()))?;
            zip.extract(dest)
                .with_context(|| format!("extracting {}", archive.display()))?;
        }
        ArchiveFormat::TarGz => {
            let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
            tar.unpack(dest)
                .with_context(|| format!("extracting {}", archive.display()))?;
        }
    }
    Ok(())
}
