//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::DceConfig;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "DCE_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
///
/// The file is `~/.dce/config.yaml` unless `--config` or `DCE_CONFIG` say
/// otherwise; the explicit path wins.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DceConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(DceConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(DceConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &DceConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_PATH_ENV)
            && !val.is_empty()
        {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".dce").join("config.yaml"))
    }
}
