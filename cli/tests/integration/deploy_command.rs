//! Integration tests for `dce system deploy` argument handling.
//!
//! Only paths that fail before any external tool or AWS call are exercised.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dce() -> (Command, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dce"));
    cmd.env("NO_COLOR", "1")
        .env("DCE_CONFIG", dir.path().join("config.yaml"))
        .env_remove("DCE_NAMESPACE")
        .env_remove("DCE_VERSION")
        .env_remove("DCE_BATCH_MODE");
    (cmd, dir)
}

#[test]
fn test_deploy_help_lists_flags() {
    let (mut cmd, _dir) = dce();
    cmd.args(["system", "deploy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dce-version"))
        .stdout(predicate::str::contains("--namespace"))
        .stdout(predicate::str::contains("--batch-mode"))
        .stdout(predicate::str::contains("--global-tags"))
        .stdout(predicate::str::contains("--tf-apply-options"));
}

#[test]
fn test_deploy_rejects_malformed_tag() {
    let (mut cmd, _dir) = dce();
    cmd.args(["system", "deploy", "--global-tags", "no-separator"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected key:value"));
}

#[test]
fn test_deploy_rejects_invalid_namespace_before_prompting() {
    let (mut cmd, _dir) = dce();
    cmd.args(["system", "deploy", "--namespace", "Not_Valid"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("resolving configuration"))
        .stderr(predicate::str::contains("Invalid namespace 'Not_Valid'"));
}

#[test]
fn test_deploy_rejects_invalid_version() {
    let (mut cmd, _dir) = dce();
    cmd.args(["system", "deploy", "--dce-version", "latest", "-b"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid DCE version 'latest'"));
}

#[test]
fn test_deploy_without_terminal_asks_for_batch_mode() {
    let (mut cmd, _dir) = dce();
    cmd.args(["system", "deploy", "--namespace", "dev"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--batch-mode"));
}
