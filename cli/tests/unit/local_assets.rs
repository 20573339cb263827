//! Release assets taken from a local directory given relative to where `dce`
//! was started, with the real scoped workdir changing the process cwd.

#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::{Path, PathBuf};

use dce_cli::application::ports::{ScopedDir, Workdir};
use dce_cli::application::services::bundle::obtain_bundle;
use dce_cli::domain::artifacts::{CODE_ASSET, CODE_LAYOUT};
use dce_cli::domain::config::anchor_relative_paths;
use dce_cli::domain::{DceConfig, DeployOverrides, resolve_deploy_config};
use dce_cli::infra::adapters::DeployAdapters;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serial_test::serial;
use zip::write::SimpleFileOptions;

fn write_code_bundle(dir: &Path) {
    std::fs::create_dir_all(dir).expect("mkdir");
    let file = std::fs::File::create(dir.join(CODE_ASSET)).expect("create zip");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    zip.add_directory("lambda/", options).expect("dir");
    zip.start_file("lambda/accounts.zip", options).expect("file");
    zip.write_all(b"package").expect("write");
    zip.add_directory("codebuild/", options).expect("dir");
    zip.finish().expect("finish");
}

/// Restores the working directory even when an assertion fails.
struct CwdGuard(PathBuf);

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[tokio::test]
#[serial]
async fn relative_local_dir_resolves_against_launch_directory() {
    let project = tempfile::tempdir().expect("tempdir");
    write_code_bundle(&project.path().join("dist"));
    let _restore = CwdGuard(std::env::current_dir().expect("cwd"));
    std::env::set_current_dir(project.path()).expect("chdir");

    let mut overrides = DeployOverrides {
        local_repo_path: Some(PathBuf::from("dist")),
        batch_mode: true,
        ..DeployOverrides::default()
    };
    let mut file = DceConfig::default();
    let launch_dir = std::env::current_dir().expect("cwd");
    anchor_relative_paths(&mut overrides, &mut file, &launch_dir);
    let config = resolve_deploy_config(&overrides, &file, |_| None, &mut StdRng::seed_from_u64(1));

    let adapters = DeployAdapters::new(None, true);
    let workdir = adapters.enter_temp("dce-artifacts-").expect("workdir");
    let contents = obtain_bundle(&adapters, &CODE_LAYOUT, &config, workdir.path())
        .await
        .expect("bundle from relative local dir");

    assert!(contents.join("lambda/accounts.zip").is_file());
    assert!(contents.join("codebuild").is_dir());
}
