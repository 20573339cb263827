//! DCE CLI - deploy and manage Disposable Cloud Environments

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dce_cli::cli::Cli;

/// Environment variable holding the log filter (e.g. `debug`, `dce_cli=trace`).
const LOG_ENV: &str = "DCE_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
