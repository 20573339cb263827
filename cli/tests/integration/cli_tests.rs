//! Integration tests for the CLI skeleton: help, version and global flags.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn dce() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dce"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    dce().assert().code(2).stderr(predicate::str::contains(
        "Deploy and manage Disposable Cloud Environments",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    dce()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("system"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    dce()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_shows_version() {
    dce()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "dce v{}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = dce()
        .args(["version", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_fails_with_usage_error() {
    dce()
        .arg("destroy-everything")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_system_help_lists_deploy() {
    dce()
        .args(["system", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"));
}
