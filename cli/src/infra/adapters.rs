//! Production wiring of every deploy port into one `DeployToolkit`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{
    ArtifactStoreConnector, LocalFs, Provisioner, ReleaseFetcher, Unarchiver, Workdir,
};
use crate::domain::artifacts::DirEntryInfo;
use crate::infra::archive::ArchiveExtractor;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::{self, ScopedWorkdir, TempWorkdir};
use crate::infra::release::HttpReleaseFetcher;
use crate::infra::storage::{AwsArtifactStore, AwsConnector};
use crate::infra::terraform::TerraformCli;

/// The real-world adapters behind `dce system deploy`.
pub struct DeployAdapters {
    terraform: TerraformCli<TokioCommandRunner>,
    releases: HttpReleaseFetcher,
    archives: ArchiveExtractor,
    aws: AwsConnector,
    workdir: TempWorkdir,
    fs: fs::LocalFs,
}

impl DeployAdapters {
    /// Build the adapters. `terraform_bin` defaults to `terraform` on `PATH`.
    #[must_use]
    pub fn new(terraform_bin: Option<&str>, quiet: bool) -> Self {
        Self {
            terraform: TerraformCli::with_bin(terraform_bin),
            releases: HttpReleaseFetcher::from_env(quiet),
            archives: ArchiveExtractor,
            aws: AwsConnector,
            workdir: TempWorkdir,
            fs: fs::LocalFs,
        }
    }
}

impl Provisioner for DeployAdapters {
    async fn init(&self, dir: &Path, extra_args: &[String]) -> Result<()> {
        self.terraform.init(dir, extra_args).await
    }

    async fn apply(&self, dir: &Path, assignments: &[String], extra_args: &[String]) -> Result<()> {
        self.terraform.apply(dir, assignments, extra_args).await
    }

    async fn output(&self, dir: &Path, name: &str) -> Result<String> {
        self.terraform.output(dir, name).await
    }
}

impl ReleaseFetcher for DeployAdapters {
    async fn download_release_asset(
        &self,
        asset: &str,
        version: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        self.releases
            .download_release_asset(asset, version, dest_dir)
            .await
    }
}

impl Unarchiver for DeployAdapters {
    async fn unarchive(&self, archive: &Path, dest: &Path) -> Result<()> {
        self.archives.unarchive(archive, dest).await
    }
}

impl ArtifactStoreConnector for DeployAdapters {
    type Store = AwsArtifactStore;

    async fn connect(&self, region: &str) -> Result<Self::Store> {
        self.aws.connect(region).await
    }
}

impl Workdir for DeployAdapters {
    type Guard = ScopedWorkdir;

    fn enter_temp(&self, prefix: &str) -> Result<Self::Guard> {
        self.workdir.enter_temp(prefix)
    }
}

impl LocalFs for DeployAdapters {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        self.fs.list_dir(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.fs.write(path, content)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        self.fs.copy(from, to)
    }
}
