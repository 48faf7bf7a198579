use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("browser-history")
}

#[test]
fn test_browsers_lists_registry() {
    let mut cmd = Command::new(get_bin());
    cmd.arg("browsers");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Registered browsers:"))
        .stdout(predicate::str::contains("chrome"))
        .stdout(predicate::str::contains("edge"))
        .stdout(predicate::str::contains("brave"))
        .stdout(predicate::str::contains("chromium"))
        .stdout(predicate::str::contains("firefox"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_browsers_reports_missing_profiles() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_bin());
    cmd.env("HOME", home.path()).arg("browsers");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("no chrome profiles found"));
}

#[test]
fn test_serve_command_help() {
    let mut cmd = Command::new(get_bin());
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Serve history over HTTP"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("8080"));
}
