#![allow(clippy::unwrap_used)]
// Smoke tests for the `gatewatch` binary surface.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_command_groups() {
    Command::cargo_bin("gatewatch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("sheet"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn sessions_help_lists_subcommands() {
    Command::cargo_bin("gatewatch")
        .unwrap()
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("disconnect"));
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("gatewatch")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gatewatch"));
}

#[test]
fn disconnect_requires_a_session_argument() {
    Command::cargo_bin("gatewatch")
        .unwrap()
        .args(["sessions", "disconnect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SESSION"));
}

#[test]
fn config_path_prints_a_toml_location() {
    Command::cargo_bin("gatewatch")
        .unwrap()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_init_writes_a_starter_profile() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("gatewatch")
        .unwrap()
        .env("XDG_CONFIG_HOME", dir.path())
        .args([
            "config",
            "init",
            "--gateway",
            "http://192.168.88.2:5000",
            "--username",
            "admin",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    let written = dir.path().join("gatewatch").join("config.toml");
    let contents = std::fs::read_to_string(written).unwrap();
    assert!(contents.contains("http://192.168.88.2:5000"));
    assert!(contents.contains("admin"));

    // A second init must refuse to clobber the existing file.
    Command::cargo_bin("gatewatch")
        .unwrap()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init", "--gateway", "http://other:5000"])
        .assert()
        .failure();
}

#[test]
fn missing_subcommand_is_an_error() {
    Command::cargo_bin("gatewatch")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
