//! End-to-end tests for global CLI behaviour (help, version, etc.).

use assert_cmd::Command;
use predicates::prelude::*;

fn envsift() -> Command {
    Command::new(env!("CARGO_BIN_EXE_envsift"))
}

#[test]
fn help_shows_usage() {
    envsift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("credentials"));
}

#[test]
fn help_lists_commands() {
    envsift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("patterns"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    envsift()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("envsift"));
}

#[test]
fn version_format() {
    let output = envsift().arg("--version").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("envsift") && stdout.chars().any(|c| c.is_ascii_digit()),
        "version should contain 'envsift' and a version number"
    );
}

#[test]
fn no_args_shows_help() {
    envsift().assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn invalid_command_fails() {
    envsift().arg("invalid-command").assert().failure();
}
