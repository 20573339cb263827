//! Application service — remote state backend bootstrap.
//!
//! Provisions the bucket that holds the main deployment's Terraform state,
//! using a throwaway working directory and the fixed bootstrap template.

use anyhow::{Context, Result};
use rand::Rng;

use crate::application::ports::{LocalFs, ProgressReporter, Provisioner, ScopedDir, Workdir};
use crate::domain::DeployConfiguration;
use crate::domain::namespace::namespace_or_default;
use crate::domain::template::{BOOTSTRAP_TEMPLATE, OUTPUT_STATE_BUCKET};

/// File the bootstrap template is written to inside the workdir.
pub const BOOTSTRAP_TEMPLATE_FILE: &str = "main.tf";

/// Create the remote state bucket and return its name.
///
/// A configuration without a namespace bootstraps under
/// `dce-default-<random8>` drawn from `rng`.
///
/// # Errors
///
/// Returns an error if the workdir cannot be prepared, if `init` or `apply`
/// fails, or if the `bucket` output is missing or empty.
pub async fn create_remote_state_backend<R: Rng + ?Sized>(
    tk: &(impl Provisioner + Workdir + LocalFs),
    reporter: &impl ProgressReporter,
    config: &DeployConfiguration,
    rng: &mut R,
) -> Result<String> {
    let namespace = namespace_or_default(&config.namespace, rng);
    let workdir = tk
        .enter_temp("dce-state-")
        .context("preparing state backend workdir")?;
    let dir = workdir.path();
    tk.write(&dir.join(BOOTSTRAP_TEMPLATE_FILE), BOOTSTRAP_TEMPLATE)
        .context("writing bootstrap template")?;

    reporter.step("Initialising state backend...");
    tk.init(dir, &config.tf_init_options)
        .await
        .context("initialising state backend")?;

    reporter.step("Creating state bucket...");
    let assignments = [
        format!("namespace={namespace}"),
        format!("aws_region={}", config.aws_region),
    ];
    tk.apply(dir, &assignments, &config.tf_apply_options)
        .await
        .context("applying state backend")?;

    let bucket = tk
        .output(dir, OUTPUT_STATE_BUCKET)
        .await
        .with_context(|| format!("reading output '{OUTPUT_STATE_BUCKET}'"))?;
    anyhow::ensure!(
        !bucket.is_empty(),
        "output '{OUTPUT_STATE_BUCKET}' of the state backend is empty"
    );

    tracing::info!(%bucket, %namespace, "state backend ready");
    reporter.success(&format!("State bucket: {bucket}"));
    Ok(bucket)
}
