//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Template errors ───────────────────────────────────────────────────────────

/// Errors raised while assembling or serializing the main Terraform template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("non-zero length value required for variable name")]
    EmptyVariableName,

    #[error("non-zero length value required for type of variable '{0}'")]
    EmptyVariableType(String),

    #[error("non-zero length value required for value of variable '{0}'")]
    EmptyVariableValue(String),

    #[error("non-zero length value required for workspace dir")]
    EmptyWorkspaceDir,

    #[error("non-zero length value required for local tf state file path")]
    EmptyStateFilePath,
}

// ── Archive layout errors ─────────────────────────────────────────────────────

/// Errors raised when an unpacked release archive has an unexpected layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unexpected contents in {archive}: expected {expected} top-level entries, found {found}")]
    WrongEntryCount {
        archive: String,
        expected: usize,
        found: usize,
    },

    #[error("unexpected contents in {archive}: missing directory '{name}'")]
    MissingDirectory { archive: String, name: String },

    #[error("unexpected contents in {archive}: '{name}' is not a directory")]
    NotADirectory { archive: String, name: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised when a resolved deploy configuration fails validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid DCE version '{0}': expected a semantic version such as 0.23.0")]
    InvalidVersion(String),

    #[error("Invalid namespace '{0}': must match ^[a-z0-9][a-z0-9-]{{0,19}}$")]
    InvalidNamespace(String),

    #[error("Invalid global tag '{0}': expected key:value")]
    InvalidTag(String),
}
