//! Human-readable terminal renderer.

use crate::domain::DeployReport;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        self.ctx.info(&format!("dce v{version}"));
    }

    /// Render the summary of a finished deploy.
    pub fn render_report(&self, report: &DeployReport) {
        println!();
        self.ctx
            .header(&format!("DCE v{} deployed", report.version));
        self.ctx.kv("Namespace:       ", &report.namespace);
        self.ctx.kv("Region:          ", &report.region);
        self.ctx.kv("State bucket:    ", &report.state_bucket);
        self.ctx.kv("Artifacts bucket:", &report.artifacts_bucket);
        if let Some(url) = &report.api_url {
            self.ctx.kv("API URL:         ", url);
        }
        self.ctx
            .kv("Functions:       ", &list_or_none(&report.compute_units));
        self.ctx.kv("Pipelines:       ", &list_or_none(&report.pipelines));
    }
}

/// Comma-joined names, or `none`.
#[must_use]
pub fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
