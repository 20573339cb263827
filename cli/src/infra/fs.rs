//! Filesystem infrastructure — implements `LocalFs` and scoped workdirs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::application::ports::{ScopedDir, Workdir};
use crate::domain::artifacts::{DirEntryInfo, EntryKind};

/// Production filesystem implementation of `LocalFs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl crate::application::ports::LocalFs for LocalFs {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in
            std::fs::read_dir(path).with_context(|| format!("reading directory {}", path.display()))?
        {
            let entry = entry.with_context(|| format!("reading directory {}", path.display()))?;
            let file_type = entry
                .file_type()
                .with_context(|| format!("inspecting {}", entry.path().display()))?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).with_context(|| format!("writing file {}", path.display()))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .with_context(|| format!("copying {} to {}", from.display(), to.display()))
    }
}

impl ScopedDir for TempDir {
    fn path(&self) -> &Path {
        TempDir::path(self)
    }
}

/// A temporary directory the process has changed into.
///
/// Dropping the guard changes back to the previous working directory and
/// then removes the temporary directory, on success and error paths alike.
#[derive(Debug)]
pub struct ScopedWorkdir {
    // Removed when the guard's fields drop, after `Drop::drop` has left it.
    dir: TempDir,
    previous: PathBuf,
}

impl ScopedWorkdir {
    /// Create a temporary directory named `<prefix>XXXX` and change into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read, the
    /// temporary directory cannot be created, or it cannot be entered.
    pub fn enter(prefix: &str) -> Result<Self> {
        let previous = std::env::current_dir().context("reading current directory")?;
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .context("creating temporary directory")?;
        std::env::set_current_dir(dir.path())
            .with_context(|| format!("entering {}", dir.path().display()))?;
        tracing::debug!(dir = %dir.path().display(), "entered workdir");
        Ok(Self { dir, previous })
    }
}

impl ScopedDir for ScopedWorkdir {
    fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScopedWorkdir {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            tracing::warn!(error = %e, dir = %self.previous.display(), "cannot restore working directory");
        }
        tracing::debug!(dir = %self.dir.path().display(), "leaving workdir");
    }
}

/// Hands out [`ScopedWorkdir`] guards.
#[derive(Debug, Default, Clone, Copy)]
pub struct TempWorkdir;

impl Workdir for TempWorkdir {
    type Guard = ScopedWorkdir;

    fn enter_temp(&self, prefix: &str) -> Result<Self::Guard> {
        ScopedWorkdir::enter(prefix)
    }
}
