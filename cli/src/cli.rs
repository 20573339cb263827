//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Deploy and manage Disposable Cloud Environments
#[derive(Parser)]
#[command(
    name = "dce",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Config file to use instead of ~/.dce/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage the DCE system
    #[command(subcommand)]
    System(commands::system::SystemCommand),

    /// Write a starter config file
    Init(commands::init::InitArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
            config,
        });
        match command {
            Command::System(cmd) => commands::system::run(&app, &cmd).await,
            Command::Init(args) => commands::init::run(&app, &args),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
