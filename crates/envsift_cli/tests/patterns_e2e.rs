//! End-to-end tests for the `envsift patterns` command.

use assert_cmd::Command;
use predicates::prelude::*;

fn envsift() -> Command {
    Command::new(env!("CARGO_BIN_EXE_envsift"))
}

#[test]
fn lists_all_rules() {
    envsift()
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("rules"))
        .stdout(predicate::str::contains("github-pat"));
}

#[test]
fn summary_mentions_dataset_version() {
    envsift()
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("dataset v1"));
}

#[test]
fn keyword_filter_narrows_output() {
    envsift()
        .args(["patterns", "--keyword", "github"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github-pat"))
        .stdout(predicate::str::contains("gitlab-pat").not());
}

#[test]
fn unknown_keyword_prints_no_matches() {
    envsift()
        .args(["patterns", "--keyword", "nosuchprovider"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no rules match"));
}

#[test]
fn verbose_shows_regex() {
    envsift()
        .args(["patterns", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("regex:"));
}
