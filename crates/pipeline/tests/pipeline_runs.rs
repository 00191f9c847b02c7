use chrono::NaiveDate;
use context_discovery::ScanMode;
use context_pipeline::{ConfigError, ContextPipeline, PipelineConfig, PipelineError};
use context_protocol::{
    DiagnosticKind, ENDPOINTS_DOCUMENT, FILES_DOCUMENT, FRAMEWORK_DOCUMENT, PRIMARY_DOCUMENT,
};
use context_vcs::NoVersionControl;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn walk_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        prefer_tracked_files: false,
        ..PipelineConfig::for_root(root)
    }
}

fn express_project(root: &Path) {
    write(
        root,
        "package.json",
        r#"{"name": "shop-api", "version": "1.0.0", "main": "src/app.js",
            "dependencies": {"express": "^4.19.2"},
            "scripts": {"start": "node src/app.js"}}"#,
    );
    write(
        root,
        "src/app.js",
        r#"const express = require("express");
const app = express();

app.get("/users", listUsers);
app.post("/users", createUser);

module.exports = app;
"#,
    );
    write(root, "node_modules/express/index.js", "module.exports = {};\n");
}

#[tokio::test]
async fn express_api_yields_endpoints_and_framework() {
    let temp = tempfile::tempdir().unwrap();
    express_project(temp.path());

    let pipeline = ContextPipeline::new(walk_config(temp.path()))
        .unwrap()
        .with_version_control(Arc::new(NoVersionControl));
    let output = pipeline.run_on(date()).await.unwrap();
    let bundle = &output.bundle;

    assert_eq!(output.scan_mode, ScanMode::Walk);
    assert_eq!(bundle.joined(FILES_DOCUMENT).unwrap(), "src/app.js\n");

    let rows: serde_json::Value =
        serde_json::from_str(&bundle.joined(ENDPOINTS_DOCUMENT).unwrap()).unwrap();
    let routes: Vec<String> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            let method = row["method"].as_str().unwrap();
            let path = row["path"].as_str().unwrap();
            format!("{method} {path}")
        })
        .collect();
    assert_eq!(routes, vec!["GET /users", "POST /users"]);
    assert_eq!(rows[0]["framework"], "express");

    let framework = bundle.joined(FRAMEWORK_DOCUMENT).unwrap();
    assert!(framework.contains("## Express"));

    let overview = bundle.joined(PRIMARY_DOCUMENT).unwrap();
    assert!(overview.starts_with("# Project context: shop-api"));
    assert!(overview.contains("Generated on 2024-06-01."));
    assert!(overview.contains("- **Entry points**: `src/app.js`"));
    assert!(!overview.contains("## Repository state"));

    let kinds: Vec<&DiagnosticKind> = output.diagnostics.iter().map(|d| &d.kind).collect();
    assert_eq!(kinds, vec![&DiagnosticKind::VersionControlUnavailable]);
}

#[tokio::test]
async fn syntax_errors_skip_only_the_broken_file() {
    let temp = tempfile::tempdir().unwrap();
    express_project(temp.path());
    write(temp.path(), "src/broken.js", "function (\n");

    let mut config = walk_config(temp.path());
    config.include_git_metadata = false;
    let output = ContextPipeline::new(config)
        .unwrap()
        .run_on(date())
        .await
        .unwrap();

    assert_eq!(output.files_discovered, 2);
    assert_eq!(output.files_analyzed, 1);
    assert_eq!(output.bundle.joined(FILES_DOCUMENT).unwrap(), "src/app.js\n");
    assert!(output.diagnostics.iter().any(|d| d.kind
        == DiagnosticKind::ParseFailure {
            path: "src/broken.js".into()
        }));
}

#[tokio::test]
async fn file_bound_reports_against_discovered_count() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "src/a.js", "function (\n");
    for name in ["b", "c", "d", "e"] {
        write(temp.path(), &format!("src/{name}.js"), "module.exports = 1;\n");
    }

    let mut config = walk_config(temp.path());
    config.include_git_metadata = false;
    config.max_files = 2;
    let output = ContextPipeline::new(config)
        .unwrap()
        .run_on(date())
        .await
        .unwrap();

    assert_eq!(output.files_discovered, 5);
    assert_eq!(output.files_analyzed, 4);
    assert_eq!(
        output.bundle.joined(FILES_DOCUMENT).unwrap(),
        "src/b.js\nsrc/c.js\n"
    );
    let excluded: Vec<&DiagnosticKind> = output
        .diagnostics
        .iter()
        .map(|d| &d.kind)
        .filter(|kind| matches!(kind, DiagnosticKind::FilesExcluded { .. }))
        .collect();
    assert_eq!(
        excluded,
        vec![&DiagnosticKind::FilesExcluded {
            kept: 2,
            excluded: 3
        }]
    );
}

#[tokio::test]
async fn missing_manifest_falls_back_to_directory_name() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "lib/index.ts", "export const answer = 42;\n");

    let mut config = walk_config(temp.path());
    config.include_git_metadata = false;
    let output = ContextPipeline::new(config)
        .unwrap()
        .run_on(date())
        .await
        .unwrap();

    let name = temp.path().file_name().unwrap().to_string_lossy().to_string();
    let overview = output.bundle.joined(PRIMARY_DOCUMENT).unwrap();
    assert!(overview.starts_with(&format!("# Project context: {name}")));
    assert!(output.bundle.get(ENDPOINTS_DOCUMENT).is_none());
    assert!(output.bundle.get(FRAMEWORK_DOCUMENT).is_none());
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::ManifestUnavailable));
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let temp = tempfile::tempdir().unwrap();
    express_project(temp.path());
    let pipeline = ContextPipeline::new(walk_config(temp.path()))
        .unwrap()
        .with_version_control(Arc::new(NoVersionControl));

    let first = pipeline.run_on(date()).await.unwrap();
    let second = pipeline.run_on(date()).await.unwrap();
    assert_eq!(first.bundle, second.bundle);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[tokio::test]
async fn git_work_tree_lists_tracked_files_and_records_state() {
    let temp = tempfile::tempdir().unwrap();
    let repo = temp.path();
    express_project(repo);
    write(repo, ".gitignore", "node_modules/\n");
    let git = |args: &[&str]| {
        let status = Command::new("git")
            .arg("-C")
            .arg(repo)
            .args(args)
            .status()
            .expect("git");
        assert!(status.success(), "git {args:?}");
    };
    git(&["init", "-q"]);
    git(&["config", "user.email", "test@example.com"]);
    git(&["config", "user.name", "Test"]);
    git(&["config", "commit.gpgsign", "false"]);
    git(&["add", "."]);
    git(&["commit", "-q", "-m", "initial"]);
    write(repo, "src/app.js", "const express = require(\"express\");\n");

    let output = ContextPipeline::new(PipelineConfig::for_root(repo))
        .unwrap()
        .run_on(date())
        .await
        .unwrap();

    assert_eq!(output.scan_mode, ScanMode::Tracked);
    let overview = output.bundle.joined(PRIMARY_DOCUMENT).unwrap();
    assert!(overview.contains("## Repository state"));
    assert!(overview.contains("- **Working tree**: dirty (1 changed files)"));
    assert!(overview.contains("git status --porcelain"));
    assert!(output.bundle.get("git_diff").is_some());
}

#[tokio::test]
async fn invalid_config_fails_before_discovery() {
    let config = PipelineConfig {
        max_files: 0,
        ..PipelineConfig::for_root("/definitely/not/here")
    };
    assert!(matches!(
        ContextPipeline::new(config),
        Err(PipelineError::Config(ConfigError::ZeroMaxFiles))
    ));

    let missing = ContextPipeline::new(PipelineConfig::for_root("/definitely/not/here")).unwrap();
    assert!(matches!(
        missing.run_on(date()).await,
        Err(PipelineError::Discovery(_))
    ));
}
