//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::DceConfig;
use crate::domain::UploadedArtifacts;
use crate::domain::artifacts::DirEntryInfo;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Provisioning Tool Port ────────────────────────────────────────────────────

/// The wrapped infrastructure-provisioning tool. Every call runs against the
/// configuration found in `dir`.
#[allow(async_fn_in_trait)]
pub trait Provisioner {
    /// Initialise the working directory (providers, modules, backend).
    async fn init(&self, dir: &Path, extra_args: &[String]) -> Result<()>;
    /// Apply the configuration. `assignments` are `name=value` variables.
    async fn apply(&self, dir: &Path, assignments: &[String], extra_args: &[String])
    -> Result<()>;
    /// Read a named output of the last apply.
    async fn output(&self, dir: &Path, name: &str) -> Result<String>;
}

// ── Artifact Ports ────────────────────────────────────────────────────────────

/// Fetches versioned release assets.
#[allow(async_fn_in_trait)]
pub trait ReleaseFetcher {
    /// Download `asset` of release `version` into `dest_dir` and return the
    /// path of the written file. Fails if the asset does not exist for that
    /// version.
    async fn download_release_asset(
        &self,
        asset: &str,
        version: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf>;
}

/// Unpacks archives.
#[allow(async_fn_in_trait)]
pub trait Unarchiver {
    /// Extract `archive` into `dest`, creating it if needed.
    async fn unarchive(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Uploads a directory tree to object storage.
#[allow(async_fn_in_trait)]
pub trait ObjectUploader {
    /// Upload every file under `local` to `bucket`, keyed by its relative
    /// path under `key_prefix`. Returns what was uploaded, by kind.
    async fn upload_directory(
        &self,
        local: &Path,
        bucket: &str,
        key_prefix: &str,
    ) -> Result<UploadedArtifacts>;
}

/// Points compute units at freshly uploaded code.
#[allow(async_fn_in_trait)]
pub trait ComputeRedeployer {
    /// Redeploy each compute unit of `namespace` from its package in `bucket`.
    async fn update_from_storage(&self, names: &[String], bucket: &str, namespace: &str)
    -> Result<()>;
}

/// Opens object-storage and compute clients for a region once it is known.
#[allow(async_fn_in_trait)]
pub trait ArtifactStoreConnector {
    type Store: ObjectUploader + ComputeRedeployer;

    /// Build clients for `region`.
    async fn connect(&self, region: &str) -> Result<Self::Store>;
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// A temporary directory that lives as long as the value.
pub trait ScopedDir {
    fn path(&self) -> &Path;
}

/// Acquires scoped temporary working directories.
pub trait Workdir {
    type Guard: ScopedDir;

    /// Create a fresh temporary directory named after `prefix`. Dropping the
    /// guard removes it and undoes any working-directory change.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or entered.
    fn enter_temp(&self, prefix: &str) -> Result<Self::Guard>;
}

/// Raw filesystem operations used by the deploy stages.
pub trait LocalFs {
    /// Top-level entries of `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;
    /// Write `content` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Copy a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` is missing or `to` cannot be written.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
}

// ── Composite Deploy Port ─────────────────────────────────────────────────────

/// Everything the deploy pipeline needs from the outside world.
pub trait DeployToolkit:
    Provisioner + ReleaseFetcher + Unarchiver + ArtifactStoreConnector + Workdir + LocalFs
{
}

/// Blanket implementation: any type implementing all sub-traits is a `DeployToolkit`.
impl<T> DeployToolkit for T where
    T: Provisioner + ReleaseFetcher + Unarchiver + ArtifactStoreConnector + Workdir + LocalFs
{
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Asks the user a yes/no question.
pub trait Confirmer {
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown (e.g. no TTY).
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Ports ───────────────────────────────────────────────────────

/// Abstracts loading and saving the YAML config file.
pub trait ConfigStore {
    /// Load the config, returning defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<DceConfig>;
    /// Persist `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &DceConfig) -> Result<()>;
    /// Location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

/// Reads environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}
