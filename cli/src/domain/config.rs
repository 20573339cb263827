//! Domain types and resolution rules for DCE configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access. Environment
//! lookups arrive as a closure so the caller decides where values come from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::namespace::random_suffix;

// ── Constants ────────────────────────────────────────────────────────────────

/// DCE release deployed when no version is configured anywhere.
pub const DEFAULT_DCE_VERSION: &str = "0.23.0";
pub const DEFAULT_AWS_REGION: &str = "us-east-1";
/// Provisioning tool looked up on `PATH` when `terraform.bin` is unset.
pub const DEFAULT_TERRAFORM_BIN: &str = "terraform";
pub const DEFAULT_BUDGET_NOTIFICATION_FROM_EMAIL: &str = "no-reply@example.com";
pub const DEFAULT_BUDGET_NOTIFICATION_TEMPLATE_SUBJECT: &str =
    "Lease {{lease_status}} for account {{account_id}}";
pub const DEFAULT_BUDGET_NOTIFICATION_TEMPLATE_TEXT: &str = "Your AWS consumption for lease \
{{lease_id}} is {{lease_status}}: spent {{actual_spend}} of a {{budget_amount}} budget.";
pub const DEFAULT_BUDGET_NOTIFICATION_TEMPLATE_HTML: &str = "<p>Your AWS consumption for lease \
{{lease_id}} is <b>{{lease_status}}</b>: spent {{actual_spend}} of a {{budget_amount}} \
budget.</p>";

/// Tags applied to every provisioned resource; user tags win on key clashes.
pub const DEFAULT_GLOBAL_TAGS: &[(&str, &str)] = &[("Terraform", "True"), ("AppName", "DCE")];

/// Environment variables consulted when neither a flag nor the config file
/// supplies a value.
pub mod env_keys {
    pub const VERSION: &str = "DCE_VERSION";
    pub const NAMESPACE: &str = "DCE_NAMESPACE";
    pub const AWS_REGION: &str = "AWS_REGION";
    pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
    pub const FROM_EMAIL: &str = "DCE_BUDGET_NOTIFICATION_FROM_EMAIL";
    pub const BCC_EMAILS: &str = "DCE_BUDGET_NOTIFICATION_BCC_EMAILS";
    pub const TEMPLATE_HTML: &str = "DCE_BUDGET_NOTIFICATION_TEMPLATE_HTML";
    pub const TEMPLATE_TEXT: &str = "DCE_BUDGET_NOTIFICATION_TEMPLATE_TEXT";
    pub const TEMPLATE_SUBJECT: &str = "DCE_BUDGET_NOTIFICATION_TEMPLATE_SUBJECT";
    pub const BATCH_MODE: &str = "DCE_BATCH_MODE";
}

static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9][a-z0-9-]{0,19}$").expect("valid regex")
});

// ── Config file schema ───────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.dce/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DceConfig {
    /// AWS region used for API calls and deployments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Provisioning tool settings.
    pub terraform: TerraformConfig,
    /// Values for `dce system deploy`.
    pub deploy: DeployFileConfig,
}

/// Provisioning tool settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TerraformConfig {
    /// Path or name of the Terraform binary. Defaults to `terraform` on `PATH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
}

/// The `deploy:` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeployFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_notification_from_email: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub budget_notification_bcc_emails: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_notification_template_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_notification_template_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_notification_template_subject: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub global_tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_mode: Option<bool>,
    /// Directory holding release assets to use instead of downloading them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_repo_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tf_init_options: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tf_apply_options: Option<String>,
}

// ── Overrides and resolved configuration ─────────────────────────────────────

/// Every field a caller may override for one deploy run, typically from CLI
/// flags. `None` / empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct DeployOverrides {
    pub version: Option<String>,
    pub namespace: Option<String>,
    pub aws_region: Option<String>,
    pub budget_notification_from_email: Option<String>,
    pub budget_notification_bcc_emails: Vec<String>,
    pub budget_notification_template_html: Option<String>,
    pub budget_notification_template_text: Option<String>,
    pub budget_notification_template_subject: Option<String>,
    pub global_tags: BTreeMap<String, String>,
    pub batch_mode: bool,
    pub local_repo_path: Option<PathBuf>,
    pub tf_init_options: Option<String>,
    pub tf_apply_options: Option<String>,
}

/// Effective configuration for one deploy run. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfiguration {
    /// Semantic version without a leading `v`.
    pub version: String,
    pub namespace: String,
    pub aws_region: String,
    pub budget_notification_from_email: String,
    pub budget_notification_bcc_emails: Vec<String>,
    pub budget_notification_template_html: String,
    pub budget_notification_template_text: String,
    pub budget_notification_template_subject: String,
    /// User tags merged over [`DEFAULT_GLOBAL_TAGS`].
    pub global_tags: BTreeMap<String, String>,
    pub batch_mode: bool,
    pub local_repo_path: Option<PathBuf>,
    pub tf_init_options: Vec<String>,
    pub tf_apply_options: Vec<String>,
}

impl DeployConfiguration {
    /// Checks the fields that downstream stages cannot recover from.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is not a semantic version or the
    /// namespace cannot be used in resource names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        semver::Version::parse(&self.version)
            .map_err(|_| ConfigError::InvalidVersion(self.version.clone()))?;
        if !NAMESPACE_RE.is_match(&self.namespace) {
            return Err(ConfigError::InvalidNamespace(self.namespace.clone()));
        }
        Ok(())
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Returns the first non-empty candidate in precedence order: explicit
/// argument, config file, environment, default.
#[must_use]
pub fn resolve(
    arg: Option<&str>,
    config: Option<&str>,
    env: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    [arg, config, env, default]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// List flavour of [`resolve`]: the first non-empty list wins.
fn resolve_list(candidates: [Option<&Vec<String>>; 3]) -> Vec<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// Strips a single leading `v` so `"v1.2.3"` and `"1.2.3"` compare equal.
#[must_use]
pub fn normalize_version(version: &str) -> String {
    let version = version.trim();
    version.strip_prefix('v').unwrap_or(version).to_string()
}

/// Parses a `key:value` tag as given on the command line.
///
/// # Errors
///
/// Returns an error if the separator is missing or the key is empty.
pub fn parse_tag(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidTag(raw.to_string())),
    }
}

/// Splits a comma-separated list, dropping blanks.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits extra provisioning-tool options on whitespace.
#[must_use]
pub fn split_options(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// Joins relative `local_repo_path` values and a relative `terraform.bin`
/// path onto `base`.
///
/// Deploy stages run with a temporary directory as the working directory, so
/// paths the user gave relative to where `dce` was started must be fixed
/// first. A bare binary name such as `terraform` is left for `PATH` lookup.
pub fn anchor_relative_paths(overrides: &mut DeployOverrides, file: &mut DceConfig, base: &Path) {
    for path in [
        overrides.local_repo_path.as_mut(),
        file.deploy.local_repo_path.as_mut(),
    ]
    .into_iter()
    .flatten()
    {
        if path.is_relative() && !path.as_os_str().is_empty() {
            *path = base.join(&*path);
        }
    }
    if let Some(bin) = file.terraform.bin.as_mut() {
        let as_path = Path::new(bin.as_str());
        if as_path.is_relative() && as_path.components().count() > 1 {
            *bin = base.join(as_path).to_string_lossy().into_owned();
        }
    }
}

/// Resolve every deploy field independently: flag > config file > env > default.
///
/// Never fails; a missing namespace becomes a random 8-character suffix
/// drawn from `rng`.
pub fn resolve_deploy_config<F, R>(
    overrides: &DeployOverrides,
    file: &DceConfig,
    env: F,
    rng: &mut R,
) -> DeployConfiguration
where
    F: Fn(&str) -> Option<String>,
    R: Rng + ?Sized,
{
    let deploy = &file.deploy;
    let env_version = env(env_keys::VERSION);
    let env_namespace = env(env_keys::NAMESPACE);
    let env_region = env(env_keys::AWS_REGION).or_else(|| env(env_keys::AWS_DEFAULT_REGION));
    let env_from = env(env_keys::FROM_EMAIL);
    let env_html = env(env_keys::TEMPLATE_HTML);
    let env_text = env(env_keys::TEMPLATE_TEXT);
    let env_subject = env(env_keys::TEMPLATE_SUBJECT);
    let env_bcc = env(env_keys::BCC_EMAILS).map(|raw| split_list(&raw));

    let version = resolve(
        overrides.version.as_deref(),
        deploy.version.as_deref(),
        env_version.as_deref(),
        Some(DEFAULT_DCE_VERSION),
    )
    .map_or_else(|| DEFAULT_DCE_VERSION.to_string(), |v| normalize_version(&v));

    let namespace = resolve(
        overrides.namespace.as_deref(),
        deploy.namespace.as_deref(),
        env_namespace.as_deref(),
        None,
    )
    .unwrap_or_else(|| random_suffix(rng));

    let aws_region = resolve(
        overrides.aws_region.as_deref(),
        file.region.as_deref(),
        env_region.as_deref(),
        Some(DEFAULT_AWS_REGION),
    )
    .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());

    let budget_notification_from_email = resolve(
        overrides.budget_notification_from_email.as_deref(),
        deploy.budget_notification_from_email.as_deref(),
        env_from.as_deref(),
        Some(DEFAULT_BUDGET_NOTIFICATION_FROM_EMAIL),
    )
    .unwrap_or_default();

    let budget_notification_template_html = resolve(
        overrides.budget_notification_template_html.as_deref(),
        deploy.budget_notification_template_html.as_deref(),
        env_html.as_deref(),
        Some(DEFAULT_BUDGET_NOTIFICATION_TEMPLATE_HTML),
    )
    .unwrap_or_default();

    let budget_notification_template_text = resolve(
        overrides.budget_notification_template_text.as_deref(),
        deploy.budget_notification_template_text.as_deref(),
        env_text.as_deref(),
        Some(DEFAULT_BUDGET_NOTIFICATION_TEMPLATE_TEXT),
    )
    .unwrap_or_default();

    let budget_notification_template_subject = resolve(
        overrides.budget_notification_template_subject.as_deref(),
        deploy.budget_notification_template_subject.as_deref(),
        env_subject.as_deref(),
        Some(DEFAULT_BUDGET_NOTIFICATION_TEMPLATE_SUBJECT),
    )
    .unwrap_or_default();

    let budget_notification_bcc_emails = resolve_list([
        Some(&overrides.budget_notification_bcc_emails),
        Some(&deploy.budget_notification_bcc_emails),
        env_bcc.as_ref(),
    ]);

    let user_tags = if overrides.global_tags.is_empty() {
        &deploy.global_tags
    } else {
        &overrides.global_tags
    };
    let mut global_tags: BTreeMap<String, String> = DEFAULT_GLOBAL_TAGS
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    global_tags.extend(user_tags.iter().map(|(k, v)| (k.clone(), v.clone())));

    let batch_mode = overrides.batch_mode
        || deploy.batch_mode.unwrap_or_else(|| {
            env(env_keys::BATCH_MODE).is_some_and(|raw| is_truthy(&raw))
        });

    let local_repo_path = overrides
        .local_repo_path
        .clone()
        .or_else(|| deploy.local_repo_path.clone())
        .filter(|p| !p.as_os_str().is_empty());

    let tf_init_options = split_options(
        resolve(
            overrides.tf_init_options.as_deref(),
            deploy.tf_init_options.as_deref(),
            None,
            None,
        )
        .as_deref(),
    );
    let tf_apply_options = split_options(
        resolve(
            overrides.tf_apply_options.as_deref(),
            deploy.tf_apply_options.as_deref(),
            None,
            None,
        )
        .as_deref(),
    );

    DeployConfiguration {
        version,
        namespace,
        aws_region,
        budget_notification_from_email,
        budget_notification_bcc_emails,
        budget_notification_template_html,
        budget_notification_template_text,
        budget_notification_template_subject,
        global_tags,
        batch_mode,
        local_repo_path,
        tf_init_options,
        tf_apply_options,
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
