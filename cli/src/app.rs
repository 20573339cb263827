//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is built once per invocation from the global flags. Command
//! handlers receive `&AppContext` and pass its parts to services as ports.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::Confirmer;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Explicit config file path (`--config`).
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Config file store.
    pub config_store: YamlConfigStore,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config_store: YamlConfigStore::new(flags.config.clone()),
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}

impl Confirmer for AppContext {
    /// Ask the user a yes/no question, defaulting to "no".
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("cannot prompt for confirmation (use --batch-mode when not on a terminal)")?;
        Ok(confirmed)
    }
}
