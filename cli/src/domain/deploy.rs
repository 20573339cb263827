//! Deploy pipeline stages and results.

use std::fmt;

use serde::Serialize;

/// Progress of one deploy run. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    Idle,
    ConfigResolved,
    StateBackendReady,
    InfraApplied,
    ArtifactsDeployed,
    Done,
}

impl DeployStage {
    /// What the run is doing while it tries to leave this stage.
    #[must_use]
    pub fn next_step(self) -> &'static str {
        match self {
            Self::Idle => "resolving configuration",
            Self::ConfigResolved => "creating remote state backend",
            Self::StateBackendReady => "applying infrastructure",
            Self::InfraApplied => "deploying code artifacts",
            Self::ArtifactsDeployed | Self::Done => "finishing deploy",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ConfigResolved => "config resolved",
            Self::StateBackendReady => "state backend ready",
            Self::InfraApplied => "infrastructure applied",
            Self::ArtifactsDeployed => "artifacts deployed",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Outputs read back after the infrastructure apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfraOutputs {
    pub artifacts_bucket: String,
    pub api_url: Option<String>,
}

/// What an upload pushed, grouped by artifact kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadedArtifacts {
    /// Compute-unit (Lambda) names, from file basenames.
    pub compute_units: Vec<String>,
    /// Build-pipeline (CodeBuild) names. Picked up on their next run; no
    /// redeploy is triggered for them.
    pub pipelines: Vec<String>,
}

/// Summary of a completed deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub version: String,
    pub namespace: String,
    pub region: String,
    pub state_bucket: String,
    pub artifacts_bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    pub compute_units: Vec<String>,
    pub pipelines: Vec<String>,
}

/// Result of the deploy use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Every stage completed.
    Deployed(DeployReport),
    /// The user declined the confirmation prompt; nothing was changed.
    Aborted,
}
