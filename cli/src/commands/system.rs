//! `dce system` — manage the DCE system itself.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::deploy::{DeployRequest, deploy};
use crate::commands::EXIT_ABORTED;
use crate::domain::config::{anchor_relative_paths, parse_tag};
use crate::domain::{DeployOutcome, DeployOverrides};
use crate::infra::adapters::DeployAdapters;
use crate::infra::env::ProcessEnv;
use crate::output::human::HumanRenderer;
use crate::output::reporter::TerminalReporter;

/// System subcommands.
#[derive(Subcommand)]
pub enum SystemCommand {
    /// Deploy DCE to the current AWS account
    Deploy(DeployArgs),
}

/// Arguments for `dce system deploy`.
#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    /// DCE release to deploy (e.g. 0.23.0)
    #[arg(id = "dce_version", long = "dce-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Namespace used as a suffix on every deployed resource
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// AWS region to deploy into
    #[arg(long)]
    pub region: Option<String>,

    /// Sender address of budget notification emails
    #[arg(long, value_name = "EMAIL")]
    pub budget_notification_from_email: Option<String>,

    /// BCC addresses of budget notification emails (repeatable or comma-separated)
    #[arg(long, value_name = "EMAIL", value_delimiter = ',')]
    pub budget_notification_bcc_emails: Vec<String>,

    /// HTML body template of budget notification emails
    #[arg(long, value_name = "TEMPLATE")]
    pub budget_notification_template_html: Option<String>,

    /// Plain-text body template of budget notification emails
    #[arg(long, value_name = "TEMPLATE")]
    pub budget_notification_template_text: Option<String>,

    /// Subject template of budget notification emails
    #[arg(long, value_name = "TEMPLATE")]
    pub budget_notification_template_subject: Option<String>,

    /// Tag applied to every resource, as key:value (repeatable)
    #[arg(long = "global-tags", value_name = "KEY:VALUE", value_parser = parse_tag)]
    pub global_tags: Vec<(String, String)>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub batch_mode: bool,

    /// Directory holding release assets to use instead of downloading them
    #[arg(long = "local", value_name = "DIR")]
    pub local_repo_path: Option<PathBuf>,

    /// Extra options passed to `terraform init`
    #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub tf_init_options: Option<String>,

    /// Extra options passed to `terraform apply`
    #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub tf_apply_options: Option<String>,
}

impl DeployArgs {
    /// Flags as resolver overrides.
    #[must_use]
    pub fn overrides(&self) -> DeployOverrides {
        DeployOverrides {
            version: self.version.clone(),
            namespace: self.namespace.clone(),
            aws_region: self.region.clone(),
            budget_notification_from_email: self.budget_notification_from_email.clone(),
            budget_notification_bcc_emails: self
                .budget_notification_bcc_emails
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            budget_notification_template_html: self.budget_notification_template_html.clone(),
            budget_notification_template_text: self.budget_notification_template_text.clone(),
            budget_notification_template_subject: self
                .budget_notification_template_subject
                .clone(),
            global_tags: self.global_tags.iter().cloned().collect(),
            batch_mode: self.batch_mode,
            local_repo_path: self.local_repo_path.clone(),
            tf_init_options: self.tf_init_options.clone(),
            tf_apply_options: self.tf_apply_options.clone(),
        }
    }
}

/// Run a system subcommand.
///
/// # Errors
///
/// Returns an error if the subcommand fails.
pub async fn run(app: &AppContext, cmd: &SystemCommand) -> Result<ExitCode> {
    match cmd {
        SystemCommand::Deploy(args) => run_deploy(app, args).await,
    }
}

async fn run_deploy(app: &AppContext, args: &DeployArgs) -> Result<ExitCode> {
    let mut file = config_service::load_config(&app.config_store)?;
    let mut overrides = args.overrides();
    let cwd = std::env::current_dir().context("reading current directory")?;
    anchor_relative_paths(&mut overrides, &mut file, &cwd);
    let adapters = DeployAdapters::new(file.terraform.bin.as_deref(), !app.output.is_interactive());
    let reporter = TerminalReporter::new(&app.output);
    let mut rng = StdRng::from_entropy();

    let request = DeployRequest {
        overrides: &overrides,
        file: &file,
    };
    let outcome = deploy(&adapters, app, &reporter, &ProcessEnv, &request, &mut rng).await?;

    match outcome {
        DeployOutcome::Deployed(report) => {
            if app.is_json() {
                println!("{}", crate::output::json::format_value(&report)?);
            } else {
                HumanRenderer::new(&app.output).render_report(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        DeployOutcome::Aborted => {
            app.output.warn("Deploy aborted, nothing was changed");
            Ok(ExitCode::from(EXIT_ABORTED))
        }
    }
}
