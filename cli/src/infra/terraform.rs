//! Infrastructure implementation of the `Provisioner` port.
//!
//! `TerraformCli<R>` routes every `terraform` call through a `CommandRunner`,
//! always with `-chdir` pointing at the configuration directory so the
//! process working directory never matters.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, Provisioner};
use crate::domain::config::DEFAULT_TERRAFORM_BIN;
use crate::infra::command_runner::TokioCommandRunner;

/// Timeout for `init` (provider and module downloads).
pub const INIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Timeout for `apply`. Creating the full DCE stack takes a while.
pub const APPLY_TIMEOUT: Duration = Duration::from_secs(3600);

/// Timeout for `output`.
pub const OUTPUT_TIMEOUT: Duration = Duration::from_secs(60);

/// Arguments for `terraform init`.
#[must_use]
pub fn init_args(dir: &Path, extra: &[String]) -> Vec<String> {
    let mut args = vec![
        chdir_arg(dir),
        "init".to_string(),
        "-input=false".to_string(),
    ];
    args.extend(extra.iter().cloned());
    args
}

/// Arguments for `terraform apply`. Each assignment becomes a `-var`.
#[must_use]
pub fn apply_args(dir: &Path, assignments: &[String], extra: &[String]) -> Vec<String> {
    let mut args = vec![
        chdir_arg(dir),
        "apply".to_string(),
        "-auto-approve".to_string(),
        "-input=false".to_string(),
    ];
    for assignment in assignments {
        args.push("-var".to_string());
        args.push(assignment.clone());
    }
    args.extend(extra.iter().cloned());
    args
}

/// Arguments for `terraform output -raw <name>`.
#[must_use]
pub fn output_args(dir: &Path, name: &str) -> Vec<String> {
    vec![
        chdir_arg(dir),
        "output".to_string(),
        "-raw".to_string(),
        name.to_string(),
    ]
}

fn chdir_arg(dir: &Path) -> String {
    format!("-chdir={}", dir.display())
}

/// Adapter around the `terraform` binary.
///
/// Generic over `R: CommandRunner` so tests can inject a recording runner.
pub struct TerraformCli<R: CommandRunner> {
    runner: R,
    bin: String,
}

impl<R: CommandRunner> TerraformCli<R> {
    pub fn new(runner: R, bin: impl Into<String>) -> Self {
        Self {
            runner,
            bin: bin.into(),
        }
    }

    async fn invoke(&self, subcommand: &str, args: &[String], timeout: Duration) -> Result<Output> {
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .runner
            .run_with_timeout(&self.bin, &refs, timeout)
            .await
            .with_context(|| format!("{} {subcommand}", self.bin))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                %subcommand,
                stdout = %String::from_utf8_lossy(&output.stdout),
                "provisioning tool failed"
            );
            anyhow::bail!(
                "{} {subcommand} exited with {}: {}",
                self.bin,
                output.status,
                stderr.trim()
            );
        }
        Ok(output)
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn with_bin(bin: Option<&str>) -> Self {
        Self::new(
            TokioCommandRunner::default(),
            bin.unwrap_or(DEFAULT_TERRAFORM_BIN),
        )
    }
}

impl<R: CommandRunner> Provisioner for TerraformCli<R> {
    async fn init(&self, dir: &Path, extra_args: &[String]) -> Result<()> {
        tracing::info!(dir = %dir.display(), "terraform init");
        self.invoke("init", &init_args(dir, extra_args), INIT_TIMEOUT)
            .await
            .map(|_| ())
    }

    async fn apply(&self, dir: &Path, assignments: &[String], extra_args: &[String]) -> Result<()> {
        tracing::info!(dir = %dir.display(), vars = assignments.len(), "terraform apply");
        self.invoke(
            "apply",
            &apply_args(dir, assignments, extra_args),
            APPLY_TIMEOUT,
        )
        .await
        .map(|_| ())
    }

    async fn output(&self, dir: &Path, name: &str) -> Result<String> {
        let output = self
            .invoke("output", &output_args(dir, name), OUTPUT_TIMEOUT)
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
