//! Integration tests for `dce init` and `dce config show`.
//!
//! Every test points `DCE_CONFIG` or `--config` at a temp path so they never
//! read or write `~/.dce/config.yaml`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dce() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dce"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_show_subcommand() {
    dce()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_config_show_without_file_prints_path() {
    let (_dir, path) = temp_config_path();
    dce()
        .args(["config", "show"])
        .env("DCE_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_flag_beats_env_var() {
    let (_dir, env_path) = temp_config_path();
    let (_dir2, flag_path) = temp_config_path();
    dce()
        .args(["config", "show", "--config", &flag_path])
        .env("DCE_CONFIG", &env_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(flag_path.as_str()));
}

#[test]
fn test_init_creates_config_without_env_backed_values() {
    let (_dir, path) = temp_config_path();
    dce()
        .arg("init")
        .env("DCE_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote config"));

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("bin: terraform"), "{content}");
    assert!(!content.contains("region:"), "{content}");
    assert!(!content.contains("version:"), "{content}");
}

#[test]
fn test_init_refuses_to_overwrite() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "region: eu-west-1\n").expect("write");
    dce()
        .arg("init")
        .env("DCE_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));
    assert_eq!(
        std::fs::read_to_string(&path).expect("read"),
        "region: eu-west-1\n"
    );
}

#[test]
fn test_init_force_overwrites() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "region: eu-west-1\n").expect("write");
    dce()
        .args(["init", "--force"])
        .env("DCE_CONFIG", &path)
        .assert()
        .success();
    assert!(
        !std::fs::read_to_string(&path)
            .expect("read")
            .contains("region: eu-west-1")
    );
}

#[test]
fn test_config_show_displays_saved_values() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "deploy:\n  namespace: team-a\n").expect("write");
    dce()
        .args(["config", "show"])
        .env("DCE_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("namespace: team-a"));
}

#[test]
fn test_config_show_json() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "region: ap-southeast-2\n").expect("write");
    let stdout = dce()
        .args(["config", "show", "--json"])
        .env("DCE_CONFIG", &path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&stdout).expect("valid JSON");
    assert_eq!(value["config"]["region"], "ap-southeast-2");
    assert_eq!(value["path"], path.as_str());
}

#[test]
fn test_config_show_invalid_yaml_fails() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "region: [unclosed\n").expect("write");
    dce()
        .args(["config", "show"])
        .env("DCE_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}
