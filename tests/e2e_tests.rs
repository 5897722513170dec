//! End-to-end tests for the pkgmig CLI
//!
//! These tests verify:
//! - Help and argument validation behavior
//! - Exit codes for fatal errors and partial failures
//! - JSON output schema from a real binary invocation

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pkgmig() -> Command {
    Command::cargo_bin("pkgmig").expect("binary should build")
}

/// Creates an input CSV listing one npm coordinate
fn write_input_csv(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("packages.csv");
    fs::write(
        &path,
        "owner,repository,type,name,version\nacme,widget,npm,widget,1.0.0\n",
    )
    .unwrap();
    path
}

/// Common arguments pointing both registries at a refused local port
fn base_args(dir: &TempDir, input: &std::path::Path) -> Vec<String> {
    vec![
        input.display().to_string(),
        "--source-url".to_string(),
        "http://127.0.0.1:1".to_string(),
        "--target-url".to_string(),
        "http://127.0.0.1:1".to_string(),
        "--source-token".to_string(),
        "src-token".to_string(),
        "--target-token".to_string(),
        "tgt-token".to_string(),
        "--source-org".to_string(),
        "acme".to_string(),
        "--target-org".to_string(),
        "acme-labs".to_string(),
        "--work-dir".to_string(),
        dir.path().join("work").display().to_string(),
    ]
}

#[test]
fn test_help_lists_flags() {
    pkgmig()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--source-url"))
        .stdout(predicate::str::contains("--target-org"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--work-dir"));
}

#[test]
fn test_missing_required_args_fails() {
    pkgmig()
        .arg("packages.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--source-url"));
}

#[test]
fn test_missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such.csv");
    let args = base_args(&dir, &missing);

    pkgmig()
        .args(&args)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_malformed_registry_url_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input_csv(&dir);
    let mut args = base_args(&dir, &input);
    args[2] = "::nope::".to_string();

    pkgmig()
        .args(&args)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed registry base URL"));
}

#[test]
fn test_unreachable_registry_exits_partial_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input_csv(&dir);
    let args = base_args(&dir, &input);

    pkgmig()
        .args(&args)
        .arg("--quiet")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("1 failed"));
}

#[test]
fn test_json_output_schema() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input_csv(&dir);
    let args = base_args(&dir, &input);

    let output = pkgmig()
        .args(&args)
        .args(["--dry-run", "--json"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["dry_run"].as_bool(), Some(true));
    assert!(json["summary"]["failed"].is_number());
    assert!(json["packages"].is_array());
    assert_eq!(json["packages"][0]["name"], "widget");
    assert_eq!(json["packages"][0]["state"], "failed");
}

#[test]
fn test_filters_can_empty_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input_csv(&dir);
    let args = base_args(&dir, &input);

    // Excluding the only package leaves nothing to migrate
    pkgmig()
        .args(&args)
        .args(["--exclude", "widget", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages"));
}

#[test]
fn test_tokens_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input_csv(&dir);
    // Tokens come from the environment instead of flags
    let mut args = base_args(&dir, &input);
    args.drain(5..9);

    pkgmig()
        .args(&args)
        .args(["--exclude", "widget", "--quiet"])
        .env("PKGMIG_SOURCE_TOKEN", "src-token")
        .env("PKGMIG_TARGET_TOKEN", "tgt-token")
        .assert()
        .success();
}
