// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end integration tests for the Check Orchestration Engine:
//! registry construction through persisted output, using the illustrative
//! check set against real temporary repositories.

use repolizer_checks::schema::RepoEntry;
use repolizer_core::batch::BatchRunner;
use repolizer_core::builtin_checks;
use repolizer_core::config::EngineConfig;
use repolizer_core::persist::{load_reports, RepairPass};
use repolizer_core::registry::CheckRegistry;
use repolizer_core::snapshot::CancelSignal;
use std::sync::Arc;
use tempfile::tempdir;

fn registry() -> Arc<CheckRegistry> {
    Arc::new(builtin_checks::register_all(CheckRegistry::builder()).build().unwrap())
}

fn config_with_output(output: &std::path::Path) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.output_path = output.to_string_lossy().to_string();
    config.batch_size = 2;
    config
}

fn well_formed_repo(root: &std::path::Path) {
    std::fs::write(root.join("README.md"), "# Widget\n\n```rust\nfn main() {}\n```\n").unwrap();
    std::fs::write(root.join("LICENSE"), "MIT License\npermission is hereby granted, free of charge").unwrap();
    std::fs::write(root.join("Cargo.toml"), "[package]\nname = \"widget\"\n").unwrap();
    std::fs::create_dir(root.join("tests")).unwrap();
    std::fs::write(root.join("CONTRIBUTING.md"), "## Setup\nRun `cargo build`.").unwrap();
    std::fs::create_dir_all(root.join(".github/workflows")).unwrap();
    std::fs::write(root.join(".github/workflows/ci.yml"), "name: ci\n").unwrap();
}

#[tokio::test]
async fn test_full_batch_run_produces_scored_reports() {
    let repos_dir = tempdir().unwrap();
    let output_dir = tempdir().unwrap();
    let output_path = output_dir.path().join("report.jsonl");

    let repo_path = repos_dir.path().join("widget");
    std::fs::create_dir(&repo_path).unwrap();
    well_formed_repo(&repo_path);

    let entries = vec![
        RepoEntry::new("1", "widget", "acme/widget").with_local_path(repo_path.to_str().unwrap()),
        RepoEntry::new("2", "empty-repo", "acme/empty-repo"),
    ];

    let config = config_with_output(&output_path);
    let mut runner = BatchRunner::new(registry(), &config).unwrap();
    let summary = runner.run(entries, CancelSignal::new()).await;

    assert_eq!(summary.total_repos, 2);
    assert_eq!(summary.processed, 2);
    assert!(summary.is_complete());

    let reports = load_reports(&output_path).unwrap();
    assert_eq!(reports.len(), 2);

    let widget_report = reports.iter().find(|r| r.repository.id == "1").unwrap();
    assert!(widget_report.overall_score > 0.0);
    assert!(widget_report.categories.contains_key("documentation"));
    assert!(widget_report.categories.contains_key("security"));

    let empty_report = reports.iter().find(|r| r.repository.id == "2").unwrap();
    // every check falls back to `skipped` with no local path, so every
    // category is degraded and the overall score is zero.
    assert_eq!(empty_report.overall_score, 0.0);
    assert!(empty_report.categories.values().all(|c| c.degraded));
}

#[tokio::test]
async fn test_cancellation_mid_batch_leaves_total_accounting_consistent() {
    let repos_dir = tempdir().unwrap();
    let output_dir = tempdir().unwrap();
    let output_path = output_dir.path().join("report.jsonl");

    let mut entries = Vec::new();
    for i in 0..6 {
        entries.push(RepoEntry::new(i.to_string(), format!("repo-{i}"), format!("acme/repo-{i}")));
    }

    let config = config_with_output(&output_path);
    let mut runner = BatchRunner::new(registry(), &config).unwrap();

    let cancel = CancelSignal::new();
    cancel.cancel();
    let summary = runner.run(entries, cancel).await;

    assert_eq!(summary.total_repos, 6);
    assert_eq!(summary.processed + summary.cancelled, summary.total_repos);
    assert_eq!(summary.cancelled, 6);
}

#[test]
fn test_repair_pass_recovers_from_injected_corruption() {
    let output_dir = tempdir().unwrap();
    let output_path = output_dir.path().join("report.jsonl");

    std::fs::write(
        &output_path,
        "{\"overall_score\": 80.0,}\ncompletely not json\n{\"overall_score\": 50.0}\n",
    )
    .unwrap();

    let summary = RepairPass::repair(&output_path).unwrap();
    assert_eq!(summary.repaired_count, 1);
    assert_eq!(summary.valid_count, 1);
    assert_eq!(summary.unrepairable.len(), 1);
    assert!(summary.backup_path.exists());
    assert!(summary.quarantine_path.exists());

    // a second pass over the now-clean file is a no-op.
    let second = RepairPass::repair(&output_path).unwrap();
    assert_eq!(second.unrepairable.len(), 0);
    assert_eq!(second.valid_count, 2);
}

#[test]
fn test_config_rejects_unknown_category() {
    let mut config = EngineConfig::default();
    config.categories.push("not-a-real-category".to_string());
    assert!(config.validate_full().is_err());
}
