//! Release assets, their expected unpacked layout, and artifact naming.
//!
//! Pure functions only — callers list directories and hand the entries in.

use std::path::{Component, Path};

use crate::domain::error::LayoutError;

// ── Release assets ───────────────────────────────────────────────────────────

/// Release asset holding the Terraform modules.
pub const INFRA_ASSET: &str = "terraform_artifacts.zip";

/// Release asset holding the Lambda and CodeBuild packages.
pub const CODE_ASSET: &str = "build_artifacts.zip";

/// Directory of compute-unit (Lambda) packages inside the code bundle.
pub const COMPUTE_UNIT_DIR: &str = "lambda";

/// Directory of build-pipeline (CodeBuild) packages inside the code bundle.
pub const PIPELINE_DIR: &str = "codebuild";

/// Directory inside the infrastructure bundle that Terraform runs in.
pub const MODULES_DIR: &str = "modules";

/// Unpacked layout of [`INFRA_ASSET`].
pub const INFRA_LAYOUT: ExpectedLayout = ExpectedLayout {
    archive: INFRA_ASSET,
    directories: &[MODULES_DIR],
};

/// Unpacked layout of [`CODE_ASSET`].
pub const CODE_LAYOUT: ExpectedLayout = ExpectedLayout {
    archive: CODE_ASSET,
    directories: &[COMPUTE_UNIT_DIR, PIPELINE_DIR],
};

// ── Layout checks ────────────────────────────────────────────────────────────

/// Kind of a top-level entry in an unpacked archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

/// A single top-level entry in an unpacked archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

/// The exact set of top-level directories an archive must unpack to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedLayout {
    pub archive: &'static str,
    pub directories: &'static [&'static str],
}

impl ExpectedLayout {
    /// Checks that `entries` holds exactly the expected directories.
    ///
    /// # Errors
    ///
    /// Returns an error on a wrong entry count, a missing directory, or an
    /// expected name that is not a directory.
    pub fn check(&self, entries: &[DirEntryInfo]) -> Result<(), LayoutError> {
        if entries.len() != self.directories.len() {
            return Err(LayoutError::WrongEntryCount {
                archive: self.archive.to_string(),
                expected: self.directories.len(),
                found: entries.len(),
            });
        }
        for name in self.directories {
            match entries.iter().find(|e| e.name == *name) {
                None => {
                    return Err(LayoutError::MissingDirectory {
                        archive: self.archive.to_string(),
                        name: (*name).to_string(),
                    });
                }
                Some(entry) if entry.kind != EntryKind::Directory => {
                    return Err(LayoutError::NotADirectory {
                        archive: self.archive.to_string(),
                        name: (*name).to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

// ── Artifact naming ──────────────────────────────────────────────────────────

/// What an uploaded file is, judged by the directory it sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    ComputeUnit(String),
    Pipeline(String),
}

/// Classifies a file by its path relative to the bundle root.
///
/// `lambda/accounts.zip` is compute unit `accounts`; `codebuild/reset.zip` is
/// pipeline `reset`. Anything else is uploaded but not reported.
#[must_use]
pub fn classify_artifact(relative: &Path) -> Option<ArtifactKind> {
    let mut components = relative.components();
    let Some(Component::Normal(dir)) = components.next() else {
        return None;
    };
    let name = relative.file_stem()?.to_str()?.to_string();
    if components.count() != 1 {
        return None;
    }
    match dir.to_str()? {
        COMPUTE_UNIT_DIR => Some(ArtifactKind::ComputeUnit(name)),
        PIPELINE_DIR => Some(ArtifactKind::Pipeline(name)),
        _ => None,
    }
}

/// Object key for `relative` under `prefix`, always `/`-separated.
#[must_use]
pub fn object_key(prefix: &str, relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(p) => Some(p.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let key = parts.join("/");
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        key
    } else {
        format!("{prefix}/{key}")
    }
}

/// Deployed function name of compute unit `name` in `namespace`.
#[must_use]
pub fn compute_unit_function_name(name: &str, namespace: &str) -> String {
    format!("{name}-{namespace}")
}

/// Object key the compute unit's code package is uploaded to.
#[must_use]
pub fn compute_unit_key(name: &str) -> String {
    format!("{COMPUTE_UNIT_DIR}/{name}.zip")
}
