//! Shared recording mocks of the deploy ports.
//!
//! `MockToolkit` keeps one ordered event log shared with the store it hands
//! out from `connect`, so tests can assert both what happened and in which
//! order. Archives are faked: `download_release_asset` writes an empty file
//! and `unarchive` lays out the directory tree configured for that asset.

#![allow(clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use dce_cli::application::ports::{
    ArtifactStoreConnector, ComputeRedeployer, ConfigStore, Confirmer, EnvSource, LocalFs,
    ObjectUploader, ProgressReporter, Provisioner, ReleaseFetcher, Unarchiver, Workdir,
};
use dce_cli::domain::artifacts::{CODE_ASSET, DirEntryInfo, INFRA_ASSET};
use dce_cli::domain::{DceConfig, UploadedArtifacts};
use dce_cli::infra::storage::{plan_uploads, summarise};

/// Ordered record of every port call.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Files (relative paths; a trailing `/` means directory) an archive unpacks to.
pub type Layout = Vec<&'static str>;

pub fn infra_layout() -> Layout {
    vec!["modules/main.tf"]
}

pub fn code_layout() -> Layout {
    vec![
        "lambda/accounts.zip",
        "lambda/workers.zip",
        "codebuild/reset.zip",
    ]
}

pub struct MockToolkit {
    pub events: EventLog,
    pub outputs: HashMap<String, String>,
    pub layouts: HashMap<&'static str, Layout>,
    pub init_calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
    /// `main.tf` in the init directory at the time of each `init`.
    pub templates_at_init: Mutex<Vec<Option<String>>>,
    pub apply_calls: Mutex<Vec<(PathBuf, Vec<String>, Vec<String>)>>,
    pub written: Mutex<Vec<(PathBuf, String)>>,
    pub downloads: Mutex<Vec<(String, String)>>,
    pub redeploys: Arc<Mutex<Vec<(Vec<String>, String, String)>>>,
    pub fail_apply_in: Option<&'static str>,
}

impl Default for MockToolkit {
    fn default() -> Self {
        let outputs = HashMap::from([
            ("bucket".to_string(), "dce-tfstate-ns-0001".to_string()),
            (
                "artifacts_bucket_name".to_string(),
                "dce-artifacts-ns".to_string(),
            ),
            (
                "api_url".to_string(),
                "https://api.example.com/api".to_string(),
            ),
        ]);
        let layouts = HashMap::from([(INFRA_ASSET, infra_layout()), (CODE_ASSET, code_layout())]);
        Self {
            events: Arc::default(),
            outputs,
            layouts,
            init_calls: Mutex::default(),
            templates_at_init: Mutex::default(),
            apply_calls: Mutex::default(),
            written: Mutex::default(),
            downloads: Mutex::default(),
            redeploys: Arc::default(),
            fail_apply_in: None,
        }
    }
}

impl MockToolkit {
    pub fn with_layout(mut self, asset: &'static str, layout: Layout) -> Self {
        self.layouts.insert(asset, layout);
        self
    }

    pub fn without_output(mut self, name: &str) -> Self {
        self.outputs.remove(name);
        self
    }

    /// Fail `apply` in workdirs whose name starts with `prefix`.
    pub fn failing_apply_in(mut self, prefix: &'static str) -> Self {
        self.fail_apply_in = Some(prefix);
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("events").clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    fn log(&self, event: impl Into<String>) {
        self.events.lock().expect("events").push(event.into());
    }

    /// The rendered main template, if one was written.
    pub fn main_template(&self) -> Option<String> {
        self.written
            .lock()
            .expect("written")
            .iter()
            .find(|(_, content)| content.contains("module \"dce\""))
            .map(|(_, content)| content.clone())
    }
}

impl Provisioner for MockToolkit {
    async fn init(&self, dir: &Path, extra_args: &[String]) -> Result<()> {
        self.log(format!("init:{}", dir.display()));
        self.init_calls
            .lock()
            .expect("init")
            .push((dir.to_path_buf(), extra_args.to_vec()));
        self.templates_at_init
            .lock()
            .expect("templates")
            .push(std::fs::read_to_string(dir.join("main.tf")).ok());
        Ok(())
    }

    async fn apply(&self, dir: &Path, assignments: &[String], extra_args: &[String]) -> Result<()> {
        self.log(format!("apply:{}", dir.display()));
        self.apply_calls.lock().expect("apply").push((
            dir.to_path_buf(),
            assignments.to_vec(),
            extra_args.to_vec(),
        ));
        if let Some(prefix) = self.fail_apply_in
            && dir
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(prefix))
        {
            anyhow::bail!("Error: creating S3 Bucket: AccessDenied");
        }
        Ok(())
    }

    async fn output(&self, _dir: &Path, name: &str) -> Result<String> {
        self.log(format!("output:{name}"));
        self.outputs
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Output \"{name}\" not found"))
    }
}

impl ReleaseFetcher for MockToolkit {
    async fn download_release_asset(
        &self,
        asset: &str,
        version: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        self.log(format!("download:{asset}"));
        self.downloads
            .lock()
            .expect("downloads")
            .push((asset.to_string(), version.to_string()));
        let path = dest_dir.join(asset);
        std::fs::write(&path, b"")?;
        Ok(path)
    }
}

impl Unarchiver for MockToolkit {
    async fn unarchive(&self, archive: &Path, dest: &Path) -> Result<()> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.log(format!("unarchive:{name}"));
        let layout = self
            .layouts
            .iter()
            .find(|(asset, _)| **asset == name)
            .map(|(_, layout)| layout.clone())
            .ok_or_else(|| anyhow::anyhow!("unknown archive {name}"))?;
        std::fs::create_dir_all(dest)?;
        for entry in layout {
            let path = dest.join(entry.trim_end_matches('/'));
            if entry.ends_with('/') {
                std::fs::create_dir_all(&path)?;
            } else {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, b"package")?;
            }
        }
        Ok(())
    }
}

impl Workdir for MockToolkit {
    type Guard = tempfile::TempDir;

    fn enter_temp(&self, prefix: &str) -> Result<Self::Guard> {
        self.log(format!("workdir:{prefix}"));
        Ok(tempfile::Builder::new().prefix(prefix).tempdir()?)
    }
}

impl LocalFs for MockToolkit {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        dce_cli::infra::fs::LocalFs.list_dir(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.written
            .lock()
            .expect("written")
            .push((path.to_path_buf(), content.to_string()));
        std::fs::write(path, content)?;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        self.log(format!(
            "copy:{}",
            from.file_name().unwrap_or_default().to_string_lossy()
        ));
        std::fs::copy(from, to)?;
        Ok(())
    }
}

impl ArtifactStoreConnector for MockToolkit {
    type Store = MockStore;

    async fn connect(&self, region: &str) -> Result<Self::Store> {
        self.log(format!("connect:{region}"));
        Ok(MockStore {
            events: Arc::clone(&self.events),
            redeploys: Arc::clone(&self.redeploys),
        })
    }
}

/// Object store + compute redeployer sharing the toolkit's event log.
pub struct MockStore {
    events: EventLog,
    redeploys: Arc<Mutex<Vec<(Vec<String>, String, String)>>>,
}

impl ObjectUploader for MockStore {
    async fn upload_directory(
        &self,
        local: &Path,
        bucket: &str,
        key_prefix: &str,
    ) -> Result<UploadedArtifacts> {
        self.events
            .lock()
            .expect("events")
            .push(format!("upload:{bucket}"));
        Ok(summarise(&plan_uploads(local, key_prefix)?))
    }
}

impl ComputeRedeployer for MockStore {
    async fn update_from_storage(
        &self,
        names: &[String],
        bucket: &str,
        namespace: &str,
    ) -> Result<()> {
        self.events
            .lock()
            .expect("events")
            .push(format!("redeploy:{}", names.join(",")));
        self.redeploys.lock().expect("redeploys").push((
            names.to_vec(),
            bucket.to_string(),
            namespace.to_string(),
        ));
        Ok(())
    }
}

// ── Interaction mocks ────────────────────────────────────────────────────────

/// Answers every prompt with `answer` and records the prompts, sharing the
/// toolkit's event log when given one.
pub struct MockConfirmer {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
    pub events: Option<EventLog>,
}

impl MockConfirmer {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::default(),
            events: None,
        }
    }

    pub fn logging_to(mut self, events: &EventLog) -> Self {
        self.events = Some(Arc::clone(events));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts").clone()
    }
}

impl Confirmer for MockConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts.lock().expect("prompts").push(prompt.to_string());
        if let Some(events) = &self.events {
            events.lock().expect("events").push("confirm".to_string());
        }
        Ok(self.answer)
    }
}

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Environment backed by a fixed map.
#[derive(Default)]
pub struct MapEnv(pub HashMap<String, String>);

impl MapEnv {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// In-memory `ConfigStore` with a fake path.
pub struct MemoryConfigStore {
    pub config: Mutex<Option<DceConfig>>,
    pub path: PathBuf,
}

impl MemoryConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            config: Mutex::new(None),
            path,
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<DceConfig> {
        Ok(self.config.lock().expect("config").clone().unwrap_or_default())
    }

    fn save(&self, config: &DceConfig) -> Result<()> {
        *self.config.lock().expect("config") = Some(config.clone());
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }
}
