//! `dce config` — inspect configuration.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the config file path and its current contents
    Show,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    if app.is_json() {
        let value = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        println!("{}", crate::output::json::format_value(&value)?);
    } else {
        let yaml = serde_yaml::to_string(&config).context("cannot serialize config")?;
        app.output.kv("Config file:", &path.display().to_string());
        println!();
        print!("{yaml}");
    }
    Ok(ExitCode::SUCCESS)
}
