// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The illustrative check set (`SPEC_FULL.md` §12).
//!
//! One or two representative checks per fixed category, each a small but
//! genuine port of the corresponding `checks/**` module's observable
//! contract: same inputs consulted (a local working tree first, falling
//! back to API metadata), same `completed`/`skipped`/`not_applicable`
//! decision points. None of these are stubs — each produces a real score
//! from real repository contents, so the Registry, Engine, Normalizer, and
//! Aggregator are exercised end to end rather than against mocked checks
//! alone.

use crate::contract::{Check, RawResult};
use crate::snapshot::{CancelSignal, RepoHandle};
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;

/// Register every illustrative check with a freshly built registry.
///
/// Convenience for callers (the CLI, integration tests) that want the full
/// default set rather than hand-picking checks.
pub fn register_all(builder: crate::registry::CheckRegistryBuilder) -> crate::registry::CheckRegistryBuilder {
    builder
        .register(std::sync::Arc::new(documentation::ReadmePresence))
        .register(std::sync::Arc::new(documentation::LicenseFilePresence))
        .register(std::sync::Arc::new(licensing::SpdxIdentifier))
        .register(std::sync::Arc::new(security::HardcodedSecretsHeuristic))
        .register(std::sync::Arc::new(maintainability::DependencyManifestPresence))
        .register(std::sync::Arc::new(code_quality::TodoDensity))
        .register(std::sync::Arc::new(testing::TestDirectoryPresence))
        .register(std::sync::Arc::new(community::ContributingGuidePresence))
        .register(std::sync::Arc::new(performance::LargeFileHeuristic))
        .register(std::sync::Arc::new(accessibility::AltTextHeuristic))
        .register(std::sync::Arc::new(ci_cd::WorkflowFilePresence))
}

/// Walk every file under `root` up to `max_depth` directories deep,
/// skipping version-control and dependency directories that would dwarf a
/// heuristic scan. Shared by several checks below; mirrors the `os.walk`
/// pattern used throughout `checks/**`.
fn walk_files(root: &Path, max_depth: usize) -> Vec<std::path::PathBuf> {
    const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target", "vendor", ".venv", "__pycache__"];
    let mut files = Vec::new();
    let mut stack = vec![(root.to_path_buf(), 0)];

    while let Some((dir, depth)) = stack.pop() {
        if depth > max_depth {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if !SKIP_DIRS.contains(&name) {
                    stack.push((path, depth + 1));
                }
            } else {
                files.push(path);
            }
        }
    }
    files
}

/// Documentation checks, grounded on
/// `checks/documentation/readme_completeness.py` and
/// `checks/documentation/license_file.py`.
pub mod documentation {
    use super::*;

    const README_VARIANTS: &[&str] =
        &["README.md", "README.MD", "Readme.md", "readme.md", "README.txt", "README", "README.rst"];

    /// Presence and basic shape of a README (`spec.md` §12).
    pub struct ReadmePresence;

    #[async_trait]
    impl Check for ReadmePresence {
        fn id(&self) -> &str {
            "readme_presence"
        }
        fn category(&self) -> &str {
            "documentation"
        }
        async fn run(&self, handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            for variant in README_VARIANTS {
                let candidate = local_path.join(variant);
                if let Ok(content) = std::fs::read_to_string(&candidate) {
                    let has_headings = content.lines().any(|l| l.trim_start().starts_with('#'));
                    let has_code_block = content.contains("```");
                    let mut score = 40.0;
                    if has_headings {
                        score += 30.0;
                    }
                    if has_code_block {
                        score += 30.0;
                    }
                    return RawResult::completed(
                        score,
                        json!({
                            "file": variant,
                            "has_headings": has_headings,
                            "has_code_block": has_code_block,
                            "size_bytes": content.len(),
                        }),
                    );
                }
            }

            RawResult::completed(0.0, json!({"file": null}))
        }
    }

    const LICENSE_FILES: &[&str] = &[
        "LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING", "COPYING.md", "COPYING.txt", "LICENSE-MIT",
        "LICENSE-APACHE",
    ];

    /// Presence of a license file, independent of its identified SPDX tag
    /// (that's [`crate::builtin_checks::licensing::SpdxIdentifier`]'s job).
    pub struct LicenseFilePresence;

    #[async_trait]
    impl Check for LicenseFilePresence {
        fn id(&self) -> &str {
            "license_file_presence"
        }
        fn category(&self) -> &str {
            "documentation"
        }
        async fn run(&self, handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            if let Some(api_license) = handle.api_data.get("license") {
                if !api_license.is_null() {
                    return RawResult::completed(100.0, json!({"source": "api", "license": api_license}));
                }
            }

            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree or API license metadata");
            };

            for candidate in LICENSE_FILES {
                let path = local_path.join(candidate);
                if path.is_file() && path.metadata().map(|m| m.len() > 0).unwrap_or(false) {
                    return RawResult::completed(100.0, json!({"source": "local", "file": candidate}));
                }
            }

            RawResult::completed(0.0, json!({"source": "local", "file": null}))
        }
    }
}

/// Licensing checks, grounded on `checks/licensing/license_file.py`'s
/// fingerprint table.
pub mod licensing {
    use super::*;

    const FINGERPRINTS: &[(&str, &str)] = &[
        ("mit", "permission is hereby granted, free of charge"),
        ("apache-2.0", "apache license"),
        ("gpl-3.0", "gnu general public license"),
        ("bsd-3-clause", "redistribution and use"),
        ("mpl-2.0", "mozilla public license"),
        ("unlicense", "public domain"),
        ("isc", "permission to use, copy, modify"),
    ];

    /// Identifies the SPDX-ish license tag from file contents via a fixed
    /// fingerprint table — same approach as the original, minus its
    /// full regex pattern set.
    pub struct SpdxIdentifier;

    #[async_trait]
    impl Check for SpdxIdentifier {
        fn id(&self) -> &str {
            "spdx_identifier"
        }
        fn category(&self) -> &str {
            "licensing"
        }
        async fn run(&self, handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            let candidates = ["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING"];
            for candidate in candidates {
                let path = local_path.join(candidate);
                let Ok(content) = std::fs::read_to_string(&path) else {
                    continue;
                };
                let lowered = content.to_lowercase();
                for (tag, fingerprint) in FINGERPRINTS {
                    if lowered.contains(fingerprint) {
                        return RawResult::completed(100.0, json!({"license_id": tag, "file": candidate}));
                    }
                }
                return RawResult::completed(40.0, json!({"license_id": "unknown", "file": candidate}));
            }

            RawResult::completed(0.0, json!({"license_id": null}))
        }
    }
}

/// Security checks, grounded on the file-scanning shape shared across
/// `checks/security/**` (not individually present in the retrieved pack,
/// so this follows the same local-tree-scan contract as the documentation
/// and code_quality checks).
pub mod security {
    use super::*;
    use regex::Regex;

    const SECRET_EXTENSIONS: &[&str] = &["env", "yml", "yaml", "json", "py", "js", "ts", "rs", "go", "rb"];

    /// Heuristic scan for hardcoded credentials: API-key-shaped or
    /// password-assignment-shaped literals in source and config files.
    pub struct HardcodedSecretsHeuristic;

    #[async_trait]
    impl Check for HardcodedSecretsHeuristic {
        fn id(&self) -> &str {
            "hardcoded_secrets_heuristic"
        }
        fn category(&self) -> &str {
            "security"
        }
        async fn run(&self, handle: &RepoHandle, cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            let pattern = Regex::new(
                r#"(?i)(api[_-]?key|secret|password|token)\s*[:=]\s*['"][A-Za-z0-9_\-]{12,}['"]"#,
            )
            .expect("static pattern is valid");

            let mut hits = 0usize;
            let mut files_scanned = 0usize;

            for path in walk_files(local_path, 6) {
                if cancel.is_cancelled() {
                    return RawResult::failed("cancelled mid-scan");
                }
                let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                    continue;
                };
                if !SECRET_EXTENSIONS.contains(&ext) {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(&path) else {
                    continue;
                };
                files_scanned += 1;
                hits += pattern.find_iter(&content).count();
            }

            let score = if hits == 0 { 100.0 } else { (100.0 - (hits as f64 * 20.0)).max(0.0) };
            RawResult::completed(score, json!({"hits": hits, "files_scanned": files_scanned}))
        }
    }
}

/// Maintainability checks, grounded on
/// `checks/maintainability/dependency_management.py`'s manifest lookup.
pub mod maintainability {
    use super::*;

    const MANIFESTS: &[&str] = &[
        "Cargo.toml",
        "package.json",
        "pyproject.toml",
        "requirements.txt",
        "go.mod",
        "pom.xml",
        "build.gradle",
        "Gemfile",
    ];

    /// Presence of a recognized dependency manifest.
    pub struct DependencyManifestPresence;

    #[async_trait]
    impl Check for DependencyManifestPresence {
        fn id(&self) -> &str {
            "dependency_manifest_presence"
        }
        fn category(&self) -> &str {
            "maintainability"
        }
        async fn run(&self, handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            for manifest in MANIFESTS {
                if local_path.join(manifest).is_file() {
                    return RawResult::completed(100.0, json!({"manifest": manifest}));
                }
            }
            RawResult::completed(0.0, json!({"manifest": null}))
        }
    }
}

/// Code-quality checks, grounded on
/// `checks/code_quality/technical_debt.py`'s marker-density analysis.
pub mod code_quality {
    use super::*;

    const CODE_EXTENSIONS: &[&str] =
        &["py", "js", "jsx", "ts", "tsx", "java", "cs", "php", "rb", "go", "rs", "kt", "swift", "c", "h"];

    /// Ratio of TODO/FIXME/HACK markers to files scanned; a dense codebase
    /// of unresolved markers scores lower.
    pub struct TodoDensity;

    #[async_trait]
    impl Check for TodoDensity {
        fn id(&self) -> &str {
            "todo_density"
        }
        fn category(&self) -> &str {
            "code_quality"
        }
        async fn run(&self, handle: &RepoHandle, cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            let mut markers = 0usize;
            let mut files_checked = 0usize;

            for path in walk_files(local_path, 8) {
                if cancel.is_cancelled() {
                    return RawResult::failed("cancelled mid-scan");
                }
                let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                    continue;
                };
                if !CODE_EXTENSIONS.contains(&ext) {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(&path) else {
                    continue;
                };
                files_checked += 1;
                let upper = content.to_uppercase();
                markers += upper.matches("TODO").count();
                markers += upper.matches("FIXME").count();
                markers += upper.matches("HACK").count();
            }

            if files_checked == 0 {
                return RawResult::skipped("no source files found");
            }

            let density = markers as f64 / files_checked as f64;
            let score = (100.0 - density * 10.0).clamp(0.0, 100.0);
            RawResult::completed(score, json!({"markers": markers, "files_checked": files_checked}))
        }
    }
}

/// Testing checks, grounded on the directory-presence shape used across
/// the corpus's structural checks.
pub mod testing {
    use super::*;

    const TEST_DIR_NAMES: &[&str] = &["tests", "test", "__tests__", "spec"];

    /// Presence of a conventionally-named test directory, or a `tests`
    /// sub-crate directory per Rust convention.
    pub struct TestDirectoryPresence;

    #[async_trait]
    impl Check for TestDirectoryPresence {
        fn id(&self) -> &str {
            "test_directory_presence"
        }
        fn category(&self) -> &str {
            "testing"
        }
        async fn run(&self, handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            for name in TEST_DIR_NAMES {
                if local_path.join(name).is_dir() {
                    return RawResult::completed(100.0, json!({"directory": name}));
                }
            }
            RawResult::completed(0.0, json!({"directory": null}))
        }
    }
}

/// Community checks, grounded on
/// `checks/community/contribution_guide.py`.
pub mod community {
    use super::*;

    const GUIDE_PATHS: &[&str] =
        &["CONTRIBUTING.md", ".github/CONTRIBUTING.md", "docs/CONTRIBUTING.md", "CONTRIBUTING"];

    /// Presence of a contribution guide, with a small quality bump when it
    /// references a code of conduct or setup instructions.
    pub struct ContributingGuidePresence;

    #[async_trait]
    impl Check for ContributingGuidePresence {
        fn id(&self) -> &str {
            "contributing_guide_presence"
        }
        fn category(&self) -> &str {
            "community"
        }
        async fn run(&self, handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            for candidate in GUIDE_PATHS {
                let path = local_path.join(candidate);
                if let Ok(content) = std::fs::read_to_string(&path) {
                    let lowered = content.to_lowercase();
                    let mut score = 60.0;
                    if lowered.contains("code of conduct") {
                        score += 20.0;
                    }
                    if lowered.contains("setup") || lowered.contains("install") {
                        score += 20.0;
                    }
                    return RawResult::completed(
                        score,
                        json!({
                            "file": candidate,
                            "has_code_of_conduct_reference": lowered.contains("code of conduct"),
                        }),
                    );
                }
            }
            RawResult::completed(0.0, json!({"file": null}))
        }
    }
}

/// Performance checks: a crude but genuine large-blob heuristic, since the
/// corpus's own performance checks (`checks/performance/**`) focus on CI
/// pipeline timing rather than repository content, which is out of scope
/// here.
pub mod performance {
    use super::*;

    const LARGE_FILE_THRESHOLD_BYTES: u64 = 5 * 1024 * 1024;

    /// Flags repositories that carry one or more very large tracked files,
    /// a common symptom of committed binaries or datasets.
    pub struct LargeFileHeuristic;

    #[async_trait]
    impl Check for LargeFileHeuristic {
        fn id(&self) -> &str {
            "large_file_heuristic"
        }
        fn category(&self) -> &str {
            "performance"
        }
        async fn run(&self, handle: &RepoHandle, cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            let mut largest = 0u64;
            let mut offenders = 0usize;

            for path in walk_files(local_path, 8) {
                if cancel.is_cancelled() {
                    return RawResult::failed("cancelled mid-scan");
                }
                if let Ok(metadata) = path.metadata() {
                    let size = metadata.len();
                    largest = largest.max(size);
                    if size > LARGE_FILE_THRESHOLD_BYTES {
                        offenders += 1;
                    }
                }
            }

            let score = if offenders == 0 { 100.0 } else { (100.0 - offenders as f64 * 15.0).max(0.0) };
            RawResult::completed(score, json!({"offenders": offenders, "largest_bytes": largest}))
        }
    }
}

/// Accessibility checks: a minimal `alt=`/`![...]()` coverage heuristic
/// over Markdown and HTML files, in the same file-scan-and-pattern-match
/// shape as `checks/documentation/readme_completeness.py`'s image check.
pub mod accessibility {
    use super::*;

    /// Ratio of images with alt text to total images found in
    /// documentation files.
    pub struct AltTextHeuristic;

    #[async_trait]
    impl Check for AltTextHeuristic {
        fn id(&self) -> &str {
            "alt_text_heuristic"
        }
        fn category(&self) -> &str {
            "accessibility"
        }
        async fn run(&self, handle: &RepoHandle, cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            let mut total_images = 0usize;
            let mut with_alt = 0usize;

            for path in walk_files(local_path, 6) {
                if cancel.is_cancelled() {
                    return RawResult::failed("cancelled mid-scan");
                }
                let is_markup = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| matches!(ext, "md" | "html" | "htm"));
                if !is_markup {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(&path) else {
                    continue;
                };

                for line in content.lines() {
                    if let Some(start) = line.find("![") {
                        total_images += 1;
                        if !line[start + 2..].starts_with(']') {
                            with_alt += 1;
                        }
                    }
                    if line.contains("<img") {
                        total_images += 1;
                        if line.contains("alt=") {
                            with_alt += 1;
                        }
                    }
                }
            }

            if total_images == 0 {
                return RawResult::skipped("no images found in documentation");
            }

            let score = (with_alt as f64 / total_images as f64) * 100.0;
            RawResult::completed(score, json!({"total_images": total_images, "with_alt": with_alt}))
        }
    }
}

/// CI/CD checks: presence of a recognized pipeline configuration, the
/// structural counterpart to `checks/ci_cd/pipeline_speed.py`'s timing
/// analysis (which requires a live CI provider and is out of scope here).
pub mod ci_cd {
    use super::*;

    const WORKFLOW_PATHS: &[&str] =
        &[".github/workflows", ".gitlab-ci.yml", ".circleci/config.yml", "Jenkinsfile", ".travis.yml"];

    /// Presence of a recognized CI/CD pipeline definition.
    pub struct WorkflowFilePresence;

    #[async_trait]
    impl Check for WorkflowFilePresence {
        fn id(&self) -> &str {
            "workflow_file_presence"
        }
        fn category(&self) -> &str {
            "ci_cd"
        }
        async fn run(&self, handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            let Some(local_path) = &handle.local_path else {
                return RawResult::skipped("no local working tree available");
            };

            for candidate in WORKFLOW_PATHS {
                let path = local_path.join(candidate);
                if path.exists() {
                    if path.is_dir() {
                        let has_workflow = std::fs::read_dir(&path)
                            .map(|mut entries| entries.next().is_some())
                            .unwrap_or(false);
                        if has_workflow {
                            return RawResult::completed(100.0, json!({"path": candidate}));
                        }
                    } else {
                        return RawResult::completed(100.0, json!({"path": candidate}));
                    }
                }
            }
            RawResult::completed(0.0, json!({"path": null}))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotProvider;
    use repolizer_checks::schema::RepoEntry;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn handle_for(dir: &std::path::Path) -> Arc<RepoHandle> {
        let entry = RepoEntry::new("1", "widget", "acme/widget").with_local_path(dir.to_str().unwrap());
        Arc::new(SnapshotProvider::snapshot(&entry))
    }

    #[tokio::test]
    async fn test_readme_presence_scores_headings_and_code() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "# Title\n\n```rust\nfn main() {}\n```\n").unwrap();
        let handle = handle_for(dir.path());
        let raw = documentation::ReadmePresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(100.0));
    }

    #[tokio::test]
    async fn test_readme_presence_missing_scores_zero() {
        let dir = tempdir().unwrap();
        let handle = handle_for(dir.path());
        let raw = documentation::ReadmePresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(0.0));
    }

    #[tokio::test]
    async fn test_license_file_presence_detects_root_license() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE"), "MIT License").unwrap();
        let handle = handle_for(dir.path());
        let raw = documentation::LicenseFilePresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(100.0));
    }

    #[tokio::test]
    async fn test_spdx_identifier_recognizes_mit_fingerprint() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE"), "Permission is hereby granted, free of charge").unwrap();
        let handle = handle_for(dir.path());
        let raw = licensing::SpdxIdentifier.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.result["license_id"], "mit");
    }

    #[tokio::test]
    async fn test_hardcoded_secrets_heuristic_flags_assignment() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("config.py"), "api_key = \"sk-aaaaaaaaaaaaaaaaaaaa\"\n").unwrap();
        let handle = handle_for(dir.path());
        let raw = security::HardcodedSecretsHeuristic.run(&handle, &CancelSignal::new()).await;
        assert!(raw.score.unwrap() < 100.0);
    }

    #[tokio::test]
    async fn test_hardcoded_secrets_heuristic_clean_repo_scores_full() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
        let handle = handle_for(dir.path());
        let raw = security::HardcodedSecretsHeuristic.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(100.0));
    }

    #[tokio::test]
    async fn test_dependency_manifest_presence_detects_cargo_toml() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        let handle = handle_for(dir.path());
        let raw = maintainability::DependencyManifestPresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(100.0));
    }

    #[tokio::test]
    async fn test_todo_density_penalizes_markers() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("lib.rs"), "// TODO: fix this\n// FIXME: and this\nfn f() {}\n").unwrap();
        let handle = handle_for(dir.path());
        let raw = code_quality::TodoDensity.run(&handle, &CancelSignal::new()).await;
        assert!(raw.score.unwrap() < 100.0);
    }

    #[tokio::test]
    async fn test_todo_density_no_source_files_is_skipped() {
        let dir = tempdir().unwrap();
        let handle = handle_for(dir.path());
        let raw = code_quality::TodoDensity.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.status, crate::contract::Status::Skipped);
    }

    #[tokio::test]
    async fn test_test_directory_presence_detects_tests_dir() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tests")).unwrap();
        let handle = handle_for(dir.path());
        let raw = testing::TestDirectoryPresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(100.0));
    }

    #[tokio::test]
    async fn test_contributing_guide_presence_bumps_score_for_setup_mention() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("CONTRIBUTING.md"), "## Setup\nRun `cargo build` to install deps.").unwrap();
        let handle = handle_for(dir.path());
        let raw = community::ContributingGuidePresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(80.0));
    }

    #[tokio::test]
    async fn test_large_file_heuristic_flags_oversized_file() {
        let dir = tempdir().unwrap();
        let big = vec![0u8; 6 * 1024 * 1024];
        std::fs::write(dir.path().join("blob.bin"), big).unwrap();
        let handle = handle_for(dir.path());
        let raw = performance::LargeFileHeuristic.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.result["offenders"], 1);
    }

    #[tokio::test]
    async fn test_alt_text_heuristic_scores_partial_coverage() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "![a](b.png)\n![](c.png)\n").unwrap();
        let handle = handle_for(dir.path());
        let raw = accessibility::AltTextHeuristic.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(50.0));
    }

    #[tokio::test]
    async fn test_workflow_file_presence_detects_github_actions() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".github/workflows")).unwrap();
        std::fs::write(dir.path().join(".github/workflows/ci.yml"), "name: ci\n").unwrap();
        let handle = handle_for(dir.path());
        let raw = ci_cd::WorkflowFilePresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.score, Some(100.0));
    }

    #[tokio::test]
    async fn test_no_local_path_is_skipped() {
        let entry = RepoEntry::new("1", "widget", "acme/widget");
        let handle = Arc::new(SnapshotProvider::snapshot(&entry));
        let raw = documentation::ReadmePresence.run(&handle, &CancelSignal::new()).await;
        assert_eq!(raw.status, crate::contract::Status::Skipped);
    }
}
