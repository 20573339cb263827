//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{DEFAULT_TERRAFORM_BIN, DceConfig, TerraformConfig};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<DceConfig> {
    store.load()
}

/// Outcome of [`init_config`].
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// A starter config was written.
    Created,
    /// A config file already exists and `force` was not set.
    AlreadyExists,
}

/// The config written by `dce init`.
///
/// Deploy values and the region stay unset: anything written here would
/// outrank the matching environment variables on every later deploy.
#[must_use]
pub fn starter_config() -> DceConfig {
    DceConfig {
        terraform: TerraformConfig {
            bin: Some(DEFAULT_TERRAFORM_BIN.to_string()),
        },
        ..DceConfig::default()
    }
}

/// Write a starter config unless one already exists.
///
/// # Errors
///
/// Returns an error if the path cannot be determined or the file cannot be
/// written.
pub fn init_config(store: &impl ConfigStore, force: bool) -> Result<InitOutcome> {
    if !force && store.path()?.exists() {
        return Ok(InitOutcome::AlreadyExists);
    }
    store.save(&starter_config())?;
    Ok(InitOutcome::Created)
}
