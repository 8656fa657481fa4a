// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("repolizer").unwrap()
}

fn write_repo_list(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("repos.json");
    fs::write(
        &path,
        r#"{"repositories": [{"id": "1", "name": "widget", "full_name": "acme/widget", "local_path": ""}]}"#,
    )
    .unwrap();
    path
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Check Orchestration Engine"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_no_args() {
    cli().assert().failure().stderr(predicate::str::contains("Usage:"));
}

// ============================================================================
// `run` subcommand
// ============================================================================

#[test]
fn test_run_help() {
    cli()
        .arg("run")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input"));
}

#[test]
fn test_run_missing_input_arg_fails() {
    cli().arg("run").assert().failure().stderr(predicate::str::contains("required"));
}

#[test]
fn test_run_nonexistent_input_fails() {
    cli()
        .arg("run")
        .arg("--input")
        .arg("/nonexistent/repos.json")
        .assert()
        .failure();
}

#[test]
fn test_run_empty_local_path_completes_and_writes_report() {
    let dir = TempDir::new().unwrap();
    let input = write_repo_list(&dir);
    let output = dir.path().join("out.jsonl");

    cli()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(output.to_str().unwrap())
        .arg("--batch-size")
        .arg("1")
        .arg("--max-concurrency")
        .arg("1")
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_run_rejects_unknown_category() {
    let dir = TempDir::new().unwrap();
    let input = write_repo_list(&dir);
    let output = dir.path().join("out.jsonl");

    cli()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(output.to_str().unwrap())
        .arg("--categories")
        .arg("bogus")
        .assert()
        .failure()
        .code(2);
}

// ============================================================================
// `repair` subcommand
// ============================================================================

#[test]
fn test_repair_help() {
    cli()
        .arg("repair")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repair"));
}

#[test]
fn test_repair_missing_path_fails() {
    cli().arg("repair").assert().failure();
}

#[test]
fn test_repair_nonexistent_file_fails() {
    cli().arg("repair").arg("/nonexistent/report.jsonl").assert().failure();
}

#[test]
fn test_repair_fixes_trailing_comma() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.jsonl");
    fs::write(&path, "{\"a\": 1,}\n").unwrap();

    cli()
        .arg("repair")
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Repaired lines:"));
}

// ============================================================================
// `config` subcommand
// ============================================================================

#[test]
fn test_config_help() {
    cli()
        .arg("config")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration"));
}

#[test]
fn test_config_show() {
    cli().arg("config").arg("show").assert().success().stdout(predicate::str::contains("batch_size"));
}

#[test]
fn test_config_validate_default_is_valid() {
    cli().arg("config").arg("validate").assert().success();
}

#[test]
fn test_config_validate_rejects_bad_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "batch_size = 0\n").unwrap();

    cli()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_config_path() {
    cli().arg("config").arg("path").assert().success();
}

// ============================================================================
// Global options and completions
// ============================================================================

#[test]
fn test_global_verbose_flag() {
    cli().arg("--verbose").arg("config").arg("show").assert().success();
}

#[test]
fn test_global_no_color_flag() {
    cli().arg("--no-color").arg("config").arg("show").assert().success();
}

#[test]
fn test_completions_bash() {
    cli()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("repolizer"));
}

#[test]
fn test_run_alias() {
    cli().arg("r").arg("--help").assert().success().stdout(predicate::str::contains("--input"));
}
