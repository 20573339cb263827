//! Tests for the remote state bootstrap stage on its own.

#![allow(clippy::expect_used)]

use dce_cli::application::services::state_backend::create_remote_state_backend;
use dce_cli::domain::{DceConfig, DeployConfiguration, DeployOverrides, resolve_deploy_config};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::mocks::{MockToolkit, NoopReporter};

fn config_with_namespace(namespace: &str) -> DeployConfiguration {
    let mut config = resolve_deploy_config(
        &DeployOverrides::default(),
        &DceConfig::default(),
        |_| None,
        &mut StdRng::seed_from_u64(1),
    );
    config.namespace = namespace.to_string();
    config
}

fn namespace_assignment(tk: &MockToolkit) -> String {
    let applies = tk.apply_calls.lock().expect("applies").clone();
    applies[0]
        .1
        .iter()
        .find(|a| a.starts_with("namespace="))
        .cloned()
        .expect("namespace assignment")
}

#[tokio::test]
async fn bootstrap_uses_resolved_namespace() {
    let tk = MockToolkit::default();

    let bucket = create_remote_state_backend(
        &tk,
        &NoopReporter,
        &config_with_namespace("team-a"),
        &mut StdRng::seed_from_u64(2),
    )
    .await
    .expect("bootstrap");

    assert_eq!(bucket, "dce-tfstate-ns-0001");
    assert_eq!(namespace_assignment(&tk), "namespace=team-a");
}

#[tokio::test]
async fn bootstrap_without_namespace_uses_default_prefix() {
    let tk = MockToolkit::default();

    create_remote_state_backend(
        &tk,
        &NoopReporter,
        &config_with_namespace(""),
        &mut StdRng::seed_from_u64(2),
    )
    .await
    .expect("bootstrap");

    let assignment = namespace_assignment(&tk);
    let suffix = assignment
        .strip_prefix("namespace=dce-default-")
        .unwrap_or_else(|| panic!("unexpected {assignment}"));
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
}

#[tokio::test]
async fn bootstrap_template_is_written_before_init() {
    let tk = MockToolkit::default();

    create_remote_state_backend(
        &tk,
        &NoopReporter,
        &config_with_namespace("dev"),
        &mut StdRng::seed_from_u64(2),
    )
    .await
    .expect("bootstrap");

    let seen = tk.templates_at_init.lock().expect("templates").clone();
    let at_init = seen[0].as_deref().expect("main.tf present at init");
    assert!(at_init.contains("output \"bucket\""));
}
