//! Application service — push code artifacts and redeploy compute units.

use anyhow::{Context, Result};

use crate::application::ports::{
    ComputeRedeployer, LocalFs, ObjectUploader, ProgressReporter, ReleaseFetcher, ScopedDir,
    Unarchiver, Workdir,
};
use crate::application::services::bundle::obtain_bundle;
use crate::domain::artifacts::CODE_LAYOUT;
use crate::domain::{DeployConfiguration, UploadedArtifacts};

/// Upload the versioned code bundle to `artifacts_bucket` and redeploy every
/// compute unit in `namespace` from it.
///
/// Build pipelines are uploaded but not triggered; they read their package
/// on the next run.
///
/// # Errors
///
/// Returns an error if the bundle cannot be obtained or has an unexpected
/// layout, or if the upload or any redeploy fails.
pub async fn deploy_artifacts(
    tk: &(impl ReleaseFetcher + Unarchiver + Workdir + LocalFs),
    store: &(impl ObjectUploader + ComputeRedeployer),
    reporter: &impl ProgressReporter,
    artifacts_bucket: &str,
    namespace: &str,
    config: &DeployConfiguration,
) -> Result<UploadedArtifacts> {
    let workdir = tk
        .enter_temp("dce-artifacts-")
        .context("preparing artifacts workdir")?;

    reporter.step(&format!("Fetching DCE v{} code artifacts...", config.version));
    let contents = obtain_bundle(tk, &CODE_LAYOUT, config, workdir.path()).await?;

    reporter.step(&format!("Uploading artifacts to {artifacts_bucket}..."));
    let uploaded = store
        .upload_directory(&contents, artifacts_bucket, "")
        .await
        .with_context(|| format!("uploading artifacts to {artifacts_bucket}"))?;
    tracing::info!(
        compute_units = uploaded.compute_units.len(),
        pipelines = uploaded.pipelines.len(),
        "artifacts uploaded"
    );

    if !uploaded.compute_units.is_empty() {
        reporter.step(&format!(
            "Updating {} functions...",
            uploaded.compute_units.len()
        ));
        store
            .update_from_storage(&uploaded.compute_units, artifacts_bucket, namespace)
            .await
            .context("redeploying functions")?;
    }

    reporter.success("Code artifacts deployed");
    Ok(uploaded)
}
