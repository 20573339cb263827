//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifacts;
pub mod config;
pub mod deploy;
pub mod error;
pub mod namespace;
pub mod template;

pub use config::{DceConfig, DeployConfiguration, DeployOverrides, resolve_deploy_config};
pub use deploy::{DeployOutcome, DeployReport, DeployStage, InfraOutputs, UploadedArtifacts};
pub use error::{ConfigError, LayoutError, TemplateError};
pub use template::{MainTemplate, TemplateVariable};
