//! AWS implementations of the artifact-store ports.
//!
//! `AwsConnector` builds S3 and Lambda clients once the deploy region is
//! resolved; `AwsArtifactStore` uploads the unpacked code bundle and points
//! each function at its new package.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use walkdir::WalkDir;

use crate::application::ports::{ArtifactStoreConnector, ComputeRedeployer, ObjectUploader};
use crate::domain::UploadedArtifacts;
use crate::domain::artifacts::{
    ArtifactKind, classify_artifact, compute_unit_function_name, compute_unit_key, object_key,
};

/// One file scheduled for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpload {
    pub path: PathBuf,
    pub key: String,
    pub kind: Option<ArtifactKind>,
}

/// Every regular file under `local`, in path order, with its object key.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked.
pub fn plan_uploads(local: &Path, key_prefix: &str) -> Result<Vec<PlannedUpload>> {
    let mut planned = Vec::new();
    for entry in WalkDir::new(local).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", local.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(local)
            .with_context(|| format!("{} is outside {}", entry.path().display(), local.display()))?;
        planned.push(PlannedUpload {
            key: object_key(key_prefix, relative),
            kind: classify_artifact(relative),
            path: entry.path().to_path_buf(),
        });
    }
    Ok(planned)
}

/// Summarise what a set of uploads delivered.
#[must_use]
pub fn summarise(planned: &[PlannedUpload]) -> UploadedArtifacts {
    let mut uploaded = UploadedArtifacts::default();
    for upload in planned {
        match &upload.kind {
            Some(ArtifactKind::ComputeUnit(name)) => uploaded.compute_units.push(name.clone()),
            Some(ArtifactKind::Pipeline(name)) => uploaded.pipelines.push(name.clone()),
            None => {}
        }
    }
    uploaded
}

/// Builds AWS clients for a region using the default credential chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsConnector;

impl ArtifactStoreConnector for AwsConnector {
    type Store = AwsArtifactStore;

    async fn connect(&self, region: &str) -> Result<Self::Store> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        tracing::debug!(%region, "AWS clients configured");
        Ok(AwsArtifactStore {
            s3: aws_sdk_s3::Client::new(&sdk_config),
            lambda: aws_sdk_lambda::Client::new(&sdk_config),
        })
    }
}

/// S3 uploads plus Lambda code updates.
pub struct AwsArtifactStore {
    s3: aws_sdk_s3::Client,
    lambda: aws_sdk_lambda::Client,
}

impl ObjectUploader for AwsArtifactStore {
    async fn upload_directory(
        &self,
        local: &Path,
        bucket: &str,
        key_prefix: &str,
    ) -> Result<UploadedArtifacts> {
        let planned = plan_uploads(local, key_prefix)?;
        for upload in &planned {
            tracing::debug!(%bucket, key = %upload.key, "put object");
            let body = ByteStream::from_path(&upload.path)
                .await
                .with_context(|| format!("reading {}", upload.path.display()))?;
            self.s3
                .put_object()
                .bucket(bucket)
                .key(&upload.key)
                .body(body)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(e)))
                .with_context(|| format!("uploading s3://{bucket}/{}", upload.key))?;
        }
        Ok(summarise(&planned))
    }
}

impl ComputeRedeployer for AwsArtifactStore {
    async fn update_from_storage(
        &self,
        names: &[String],
        bucket: &str,
        namespace: &str,
    ) -> Result<()> {
        for name in names {
            let function = compute_unit_function_name(name, namespace);
            let key = compute_unit_key(name);
            tracing::info!(%function, %bucket, %key, "updating function code");
            self.lambda
                .update_function_code()
                .function_name(&function)
                .s3_bucket(bucket)
                .s3_key(&key)
                .publish(true)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(e)))
                .with_context(|| format!("updating function {function}"))?;
        }
        Ok(())
    }
}
