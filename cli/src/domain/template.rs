//! Terraform configuration generated for each deploy run.
//!
//! The main template declares every input as a `variable` with a default and
//! passes it through to the DCE module, so the rendered file can be fed to
//! `terraform` directly without going through the CLI again.
//!
//! Pure functions only — rendering returns a `String`; writing it to disk is
//! the caller's job.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::domain::config::{DeployConfiguration, normalize_version};
use crate::domain::error::TemplateError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Repository path of the DCE Terraform module, without the `?ref=` suffix.
pub const DCE_MODULE_REPO: &str = "github.com/Optum/dce//modules";

/// Name of the module block in the main template.
pub const MODULE_NAME: &str = "dce";

/// Output holding the bucket that receives Lambda and CodeBuild artifacts.
pub const OUTPUT_ARTIFACTS_BUCKET: &str = "artifacts_bucket_name";

/// Output holding the base URL of the deployed API.
pub const OUTPUT_API_URL: &str = "api_url";

/// Output of the bootstrap template holding the state bucket name.
pub const OUTPUT_STATE_BUCKET: &str = "bucket";

/// Minimal template that provisions the bucket holding Terraform state.
pub const BOOTSTRAP_TEMPLATE: &str = include_str!("../../templates/bootstrap.tf");

const DECLARED_OUTPUTS: &[(&str, &str)] = &[
    (
        OUTPUT_ARTIFACTS_BUCKET,
        "S3 bucket for artifacts like AWS Lambda code",
    ),
    (OUTPUT_API_URL, "URL of DCE API"),
];

// ── Types ────────────────────────────────────────────────────────────────────

/// One `variable` declaration plus its pass-through into the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariable {
    pub name: String,
    /// Terraform type constraint, e.g. `string` or `map(string)`.
    pub var_type: String,
    /// For `string` variables the raw value; for any other type an HCL
    /// expression.
    pub value: String,
}

impl TemplateVariable {
    /// `name=value`, as passed to `terraform apply -var`.
    #[must_use]
    pub fn assignment(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    fn default_literal(&self) -> String {
        if self.var_type == "string" {
            hcl_string(&self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Local-file backend settings. Both fields are required when selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBackend {
    pub state_file_path: String,
    pub workspace_dir: String,
}

/// State backend declared in the template's `terraform` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Local(LocalBackend),
    /// Partial S3 configuration, completed by `init -backend-config=...`.
    S3,
}

/// The generated main Terraform template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainTemplate {
    variables: Vec<TemplateVariable>,
    version: String,
    local_module: Option<String>,
    backend: Option<Backend>,
}

impl MainTemplate {
    /// Creates an empty template pinned to `version` of the DCE module.
    #[must_use]
    pub fn new(version: &str) -> Self {
        Self {
            variables: Vec::new(),
            version: normalize_version(version),
            local_module: None,
            backend: None,
        }
    }

    /// Sources the module from an unpacked copy of the release at `path`
    /// (relative to the template) instead of the versioned repository.
    #[must_use]
    pub fn with_local_module(mut self, path: &str) -> Self {
        self.local_module = Some(path.to_string());
        self
    }

    /// Selects the local-file backend.
    #[must_use]
    pub fn with_local_backend(mut self, state_file_path: &str, workspace_dir: &str) -> Self {
        self.backend = Some(Backend::Local(LocalBackend {
            state_file_path: state_file_path.to_string(),
            workspace_dir: workspace_dir.to_string(),
        }));
        self
    }

    /// Selects the S3 backend; bucket, key and region come from `init`.
    #[must_use]
    pub fn with_s3_backend(mut self) -> Self {
        self.backend = Some(Backend::S3);
        self
    }

    /// Appends a variable. Duplicate names are kept and all rendered.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the template unchanged, if any argument is
    /// empty.
    pub fn add_variable(
        &mut self,
        name: &str,
        var_type: &str,
        value: &str,
    ) -> Result<(), TemplateError> {
        if name.is_empty() {
            return Err(TemplateError::EmptyVariableName);
        }
        if var_type.is_empty() {
            return Err(TemplateError::EmptyVariableType(name.to_string()));
        }
        if value.is_empty() {
            return Err(TemplateError::EmptyVariableValue(name.to_string()));
        }
        self.variables.push(TemplateVariable {
            name: name.to_string(),
            var_type: var_type.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    #[must_use]
    pub fn variables(&self) -> &[TemplateVariable] {
        &self.variables
    }

    /// Every variable as a `name=value` assignment, in insertion order.
    #[must_use]
    pub fn assignments(&self) -> Vec<String> {
        self.variables
            .iter()
            .map(TemplateVariable::assignment)
            .collect()
    }

    /// `<repo>?ref=v<version>`, or the local module path when one is set.
    #[must_use]
    pub fn module_source(&self) -> String {
        match &self.local_module {
            Some(path) => path.clone(),
            None => format!("{DCE_MODULE_REPO}?ref=v{}", self.version),
        }
    }

    /// Serializes the template. Output is byte-stable for identical input.
    ///
    /// # Errors
    ///
    /// Returns an error before producing any text if the local backend is
    /// selected with an empty workspace dir or state file path.
    pub fn render(&self) -> Result<String, TemplateError> {
        if let Some(Backend::Local(backend)) = &self.backend {
            if backend.workspace_dir.is_empty() {
                return Err(TemplateError::EmptyWorkspaceDir);
            }
            if backend.state_file_path.is_empty() {
                return Err(TemplateError::EmptyStateFilePath);
            }
        }

        let mut out = String::new();
        match &self.backend {
            Some(Backend::Local(backend)) => {
                let _ = write!(
                    out,
                    "terraform {{\n  backend \"local\" {{\n    path = {}\n    workspace_dir = {}\n  }}\n}}\n\n",
                    hcl_string(&backend.state_file_path),
                    hcl_string(&backend.workspace_dir),
                );
            }
            Some(Backend::S3) => out.push_str("terraform {\n  backend \"s3\" {}\n}\n\n"),
            None => {}
        }

        for var in &self.variables {
            let _ = write!(
                out,
                "variable \"{}\" {{\n  type = {}\n  default = {}\n}}\n\n",
                var.name,
                var.var_type,
                var.default_literal(),
            );
        }

        let _ = writeln!(out, "module \"{MODULE_NAME}\" {{");
        let _ = writeln!(out, "  source=\"{}\"", self.module_source());
        for var in &self.variables {
            let _ = writeln!(out, "  {0}=var.{0}", var.name);
        }
        out.push_str("}\n");

        for (name, description) in DECLARED_OUTPUTS {
            let _ = write!(
                out,
                "\noutput \"{name}\" {{\n  description = \"{description}\"\n  value = module.{MODULE_NAME}.{name}\n}}\n",
            );
        }
        Ok(out)
    }
}

// ── Deploy template ──────────────────────────────────────────────────────────

/// Builds the main template for a resolved deploy configuration.
///
/// # Errors
///
/// Returns an error if a resolved field that the module requires is empty.
pub fn deploy_template(config: &DeployConfiguration) -> Result<MainTemplate, TemplateError> {
    let mut template = MainTemplate::new(&config.version);
    template.add_variable("namespace", "string", &config.namespace)?;
    template.add_variable("aws_region", "string", &config.aws_region)?;
    template.add_variable(
        "budget_notification_from_email",
        "string",
        &config.budget_notification_from_email,
    )?;
    template.add_variable(
        "budget_notification_bcc_emails",
        "list(string)",
        &hcl_list(&config.budget_notification_bcc_emails),
    )?;
    template.add_variable(
        "budget_notification_template_html",
        "string",
        &config.budget_notification_template_html,
    )?;
    template.add_variable(
        "budget_notification_template_text",
        "string",
        &config.budget_notification_template_text,
    )?;
    template.add_variable(
        "budget_notification_template_subject",
        "string",
        &config.budget_notification_template_subject,
    )?;
    template.add_variable("global_tags", "map(string)", &hcl_map(&config.global_tags))?;
    Ok(template)
}

// ── HCL literals ─────────────────────────────────────────────────────────────

/// Quotes `value` as an HCL string literal.
#[must_use]
pub fn hcl_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace("${", "$${")
        .replace("%{", "%%{");
    format!("\"{escaped}\"")
}

/// `["a", "b"]`; `[]` when empty.
#[must_use]
pub fn hcl_list(items: &[String]) -> String {
    let parts: Vec<String> = items.iter().map(|i| hcl_string(i)).collect();
    format!("[{}]", parts.join(", "))
}

/// `{"k" = "v", ...}` in key order; `{}` when empty.
#[must_use]
pub fn hcl_map(entries: &BTreeMap<String, String>) -> String {
    let parts: Vec<String> = entries
        .iter()
        .map(|(k, v)| format!("{} = {}", hcl_string(k), hcl_string(v)))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
