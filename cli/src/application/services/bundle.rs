//! Obtaining and unpacking a versioned release bundle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ReleaseFetcher, Unarchiver};
use crate::domain::DeployConfiguration;
use crate::domain::artifacts::ExpectedLayout;

/// Directory inside the scoped workdir that the release for `version` is
/// unpacked into, e.g. `dce-v0.23.0`.
#[must_use]
pub fn release_dir_name(version: &str) -> String {
    format!("dce-v{version}")
}

/// Fetch `layout.archive` into `workdir`, unpack it and check its layout.
///
/// The archive is copied from `config.local_repo_path` when one is set and
/// downloaded for `config.version` otherwise. Returns the directory holding
/// the unpacked top-level entries.
///
/// # Errors
///
/// Returns an error if the asset cannot be obtained or unpacked, or if the
/// unpacked tree does not match `layout` exactly.
pub async fn obtain_bundle(
    tk: &(impl ReleaseFetcher + Unarchiver + LocalFs),
    layout: &ExpectedLayout,
    config: &DeployConfiguration,
    workdir: &Path,
) -> Result<PathBuf> {
    let archive = match &config.local_repo_path {
        Some(repo) => {
            let source = repo.join(layout.archive);
            let dest = workdir.join(layout.archive);
            tk.copy(&source, &dest)
                .with_context(|| format!("copying {}", source.display()))?;
            dest
        }
        None => tk
            .download_release_asset(layout.archive, &config.version, workdir)
            .await
            .with_context(|| {
                format!("downloading {} for v{}", layout.archive, config.version)
            })?,
    };

    let contents = workdir.join(release_dir_name(&config.version));
    tk.unarchive(&archive, &contents)
        .await
        .with_context(|| format!("unpacking {}", layout.archive))?;

    let entries = tk
        .list_dir(&contents)
        .with_context(|| format!("listing unpacked {}", layout.archive))?;
    layout.check(&entries)?;
    tracing::debug!(archive = layout.archive, dir = %contents.display(), "bundle unpacked");
    Ok(contents)
}
