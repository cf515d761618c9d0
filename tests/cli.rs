//! Binary-level CLI tests.
//!
//! These stay on paths that never reach an external tool: argument parsing
//! and the missing-manifest fatal check.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_flags() {
    Command::cargo_bin("wheelsmith")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--include-deps"))
        .stdout(predicate::str::contains("--no-bump"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn missing_manifest_exits_with_code_one() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("wheelsmith")
        .unwrap()
        .args(["--no-bump", "--project-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("pyproject.toml"));
}

#[test]
fn conflicting_bump_flags_are_rejected() {
    Command::cargo_bin("wheelsmith")
        .unwrap()
        .args(["--no-bump", "--bump-version", "patch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--no-bump"));
}

#[test]
fn invalid_bump_kind_is_rejected() {
    Command::cargo_bin("wheelsmith")
        .unwrap()
        .args(["--bump-version", "mega"])
        .assert()
        .failure();
}
