//! `dce init` — write a starter config file.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service::{InitOutcome, init_config};

/// Arguments for the `dce init` command.
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

/// Entry point for `dce init`.
///
/// # Errors
///
/// Returns an error if the config path cannot be determined or written.
pub fn run(app: &AppContext, args: &InitArgs) -> Result<ExitCode> {
    let path = app.config_store.path()?;
    match init_config(&app.config_store, args.force)? {
        InitOutcome::Created => {
            app.output
                .success(&format!("Wrote config to {}", path.display()));
            Ok(ExitCode::SUCCESS)
        }
        InitOutcome::AlreadyExists => {
            app.output.error(&format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ));
            Ok(ExitCode::FAILURE)
        }
    }
}
