//! Application service — apply the versioned DCE infrastructure.

use anyhow::{Context, Result};

use crate::application::ports::{
    LocalFs, ProgressReporter, Provisioner, ReleaseFetcher, ScopedDir, Unarchiver, Workdir,
};
use crate::application::services::bundle::{obtain_bundle, release_dir_name};
use crate::domain::artifacts::{INFRA_LAYOUT, MODULES_DIR};
use crate::domain::template::{OUTPUT_API_URL, OUTPUT_ARTIFACTS_BUCKET, deploy_template};
use crate::domain::{DeployConfiguration, InfraOutputs};

/// Key of the main deployment's state object inside the state bucket.
pub const STATE_KEY: &str = "local-tfstate";

/// File the generated main template is written to inside the workdir.
pub const MAIN_TEMPLATE_FILE: &str = "main.tf";

/// `-backend-config` arguments pointing `init` at the state bucket.
#[must_use]
pub fn backend_config_args(state_bucket: &str, region: &str) -> Vec<String> {
    vec![
        format!("-backend-config=bucket={state_bucket}"),
        format!("-backend-config=key={STATE_KEY}"),
        format!("-backend-config=region={region}"),
    ]
}

/// Module path, relative to the workdir, of the unpacked infrastructure
/// bundle for `version`.
#[must_use]
pub fn local_module_path(version: &str) -> String {
    format!("./{}/{MODULES_DIR}", release_dir_name(version))
}

/// Apply the infrastructure for `config` and return its outputs.
///
/// The template is rendered before anything touches disk, so a missing
/// required field fails the run without side effects. Archive layout is
/// checked before the provisioning tool runs. The tool runs in the workdir
/// root against the rendered `main.tf`, whose module block points at the
/// unpacked bundle.
///
/// # Errors
///
/// Returns an error if the template is invalid, the bundle cannot be
/// obtained or has an unexpected layout, `init`/`apply` fail, or the
/// `artifacts_bucket_name` output is missing.
pub async fn create_infrastructure(
    tk: &(impl Provisioner + ReleaseFetcher + Unarchiver + Workdir + LocalFs),
    reporter: &impl ProgressReporter,
    state_bucket: &str,
    config: &DeployConfiguration,
) -> Result<InfraOutputs> {
    let template = deploy_template(config)
        .context("building main template")?
        .with_local_module(&local_module_path(&config.version))
        .with_s3_backend();
    let rendered = template.render().context("rendering main template")?;

    let workdir = tk
        .enter_temp("dce-infra-")
        .context("preparing infrastructure workdir")?;

    reporter.step(&format!("Fetching DCE v{} infrastructure...", config.version));
    let root = workdir.path();
    obtain_bundle(tk, &INFRA_LAYOUT, config, root).await?;

    tk.write(&root.join(MAIN_TEMPLATE_FILE), &rendered)
        .context("writing main template")?;

    let mut init_args = backend_config_args(state_bucket, &config.aws_region);
    init_args.extend(config.tf_init_options.iter().cloned());

    reporter.step("Initialising infrastructure...");
    tk.init(root, &init_args)
        .await
        .context("initialising infrastructure")?;

    reporter.step("Applying infrastructure (this can take several minutes)...");
    tk.apply(root, &template.assignments(), &config.tf_apply_options)
        .await
        .context("applying infrastructure")?;

    let artifacts_bucket = tk
        .output(root, OUTPUT_ARTIFACTS_BUCKET)
        .await
        .with_context(|| format!("reading output '{OUTPUT_ARTIFACTS_BUCKET}'"))?;
    anyhow::ensure!(
        !artifacts_bucket.is_empty(),
        "output '{OUTPUT_ARTIFACTS_BUCKET}' is empty"
    );

    let api_url = match tk.output(root, OUTPUT_API_URL).await {
        Ok(url) if !url.is_empty() => Some(url),
        Ok(_) => None,
        Err(e) => {
            reporter.warn(&format!("Could not read output '{OUTPUT_API_URL}'"));
            tracing::warn!(error = %e, "api_url output unavailable");
            None
        }
    };

    tracing::info!(%artifacts_bucket, "infrastructure applied");
    reporter.success(&format!("Artifacts bucket: {artifacts_bucket}"));
    Ok(InfraOutputs {
        artifacts_bucket,
        api_url,
    })
}
