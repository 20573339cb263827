//! Application service — the `dce system deploy` use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! Stages run strictly in order and each one's output feeds the next:
//! resolve config → state backend → infrastructure → code artifacts. The
//! first failure ends the run; infrastructure already applied is left in
//! place for the next apply to reconcile.

use anyhow::{Context, Result};
use rand::Rng;

use crate::application::ports::{
    ArtifactStoreConnector, Confirmer, DeployToolkit, EnvSource, ProgressReporter,
};
use crate::application::services::artifacts::deploy_artifacts;
use crate::application::services::infrastructure::create_infrastructure;
use crate::application::services::state_backend::create_remote_state_backend;
use crate::domain::{
    DceConfig, DeployConfiguration, DeployOutcome, DeployOverrides, DeployReport, DeployStage,
    resolve_deploy_config,
};

/// Inputs of one deploy run before resolution.
pub struct DeployRequest<'a> {
    /// Values given explicitly, usually CLI flags.
    pub overrides: &'a DeployOverrides,
    /// The parsed config file.
    pub file: &'a DceConfig,
}

/// Question shown before any stage mutates anything.
#[must_use]
pub fn confirmation_prompt(config: &DeployConfiguration) -> String {
    format!(
        "Deploy DCE v{} to namespace '{}' in {}? This creates AWS resources that may incur costs",
        config.version, config.namespace, config.aws_region
    )
}

fn advance(stage: &mut DeployStage, next: DeployStage) {
    tracing::info!(from = %stage, to = %next, "deploy stage complete");
    *stage = next;
}

/// Run a full deploy.
///
/// Unless batch mode is resolved, the user is asked exactly once, after
/// configuration is resolved and before the first mutating stage. Declining
/// returns [`DeployOutcome::Aborted`].
///
/// # Errors
///
/// Returns an error naming the stage that failed if the configuration is
/// invalid or any stage fails.
pub async fn deploy<R: Rng + ?Sized>(
    tk: &impl DeployToolkit,
    confirmer: &impl Confirmer,
    reporter: &impl ProgressReporter,
    env: &impl EnvSource,
    request: &DeployRequest<'_>,
    rng: &mut R,
) -> Result<DeployOutcome> {
    let mut stage = DeployStage::Idle;

    let config = resolve_deploy_config(request.overrides, request.file, |key| env.var(key), rng);
    config
        .validate()
        .with_context(|| format!("deploy failed while {}", stage.next_step()))?;
    advance(&mut stage, DeployStage::ConfigResolved);

    if !config.batch_mode && !confirmer.confirm(&confirmation_prompt(&config))? {
        tracing::info!("deploy declined at confirmation prompt");
        return Ok(DeployOutcome::Aborted);
    }

    let state_bucket = create_remote_state_backend(tk, reporter, &config, rng)
        .await
        .with_context(|| format!("deploy failed while {}", stage.next_step()))?;
    advance(&mut stage, DeployStage::StateBackendReady);

    let infra = create_infrastructure(tk, reporter, &state_bucket, &config)
        .await
        .with_context(|| format!("deploy failed while {}", stage.next_step()))?;
    advance(&mut stage, DeployStage::InfraApplied);

    let uploaded = async {
        let store = tk
            .connect(&config.aws_region)
            .await
            .context("connecting to AWS")?;
        deploy_artifacts(
            tk,
            &store,
            reporter,
            &infra.artifacts_bucket,
            &config.namespace,
            &config,
        )
        .await
    }
    .await
    .with_context(|| format!("deploy failed while {}", stage.next_step()))?;
    advance(&mut stage, DeployStage::ArtifactsDeployed);

    advance(&mut stage, DeployStage::Done);
    Ok(DeployOutcome::Deployed(DeployReport {
        version: config.version,
        namespace: config.namespace,
        region: config.aws_region,
        state_bucket,
        artifacts_bucket: infra.artifacts_bucket,
        api_url: infra.api_url,
        compute_units: uploaded.compute_units,
        pipelines: uploaded.pipelines,
    }))
}
