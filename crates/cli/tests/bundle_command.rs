use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn setup_project() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(
        root,
        "package.json",
        r#"{"name": "todo-api", "dependencies": {"express": "^4.18.0"}}"#,
    );
    write(
        root,
        "src/server.js",
        r#"const express = require("express");
const app = express();
app.get("/todos", listTodos);
app.delete("/todos/:id", removeTodo);
"#,
    );
    write(
        root,
        "src/todo.service.ts",
        "export class TodoService {\n  all() { return []; }\n}\n",
    );
    temp
}

#[allow(deprecated)]
fn bundle_cmd(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("context-bundle").expect("binary");
    cmd.arg(root).arg("--no-git").arg("--no-tracked");
    cmd
}

#[test]
fn writes_bundle_into_default_directory() {
    let temp = setup_project();
    let root = temp.path();

    bundle_cmd(root).assert().success();

    let out = root.join(".context-bundle");
    for name in [
        "context.md",
        "files.txt",
        "structure.json",
        "endpoints.json",
        "dependencies.json",
        "framework.md",
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }
    assert!(!out.join("git_diff.txt").exists());

    let overview = fs::read_to_string(out.join("context.md")).unwrap();
    assert!(overview.starts_with("# Project context: todo-api"));
    let files = fs::read_to_string(out.join("files.txt")).unwrap();
    assert_eq!(files, "src/server.js\nsrc/todo.service.ts\n");
}

#[test]
fn json_summary_lists_documents_and_diagnostics() {
    let temp = setup_project();
    let root = temp.path();
    let out = root.join("bundle");

    let output = bundle_cmd(root)
        .arg("--output")
        .arg(&out)
        .arg("--max-files")
        .arg("1")
        .arg("--json")
        .output()
        .expect("run");
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(summary["files_discovered"], 2);
    let documents: Vec<&str> = summary["documents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(documents[0], "context.md");
    assert!(documents.contains(&"endpoints.json"));
    assert!(summary["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["kind"]["type"] == "files_excluded" && d["kind"]["excluded"] == 1));
    assert!(out.join("context.md").is_file());
}

#[test]
fn split_strategy_writes_numbered_parts() {
    let temp = setup_project();
    let root = temp.path();

    bundle_cmd(root)
        .args(["--strategy", "split", "--max-lines", "4"])
        .assert()
        .success();

    let out = root.join(".context-bundle");
    assert!(out.join("structure_part2.json").is_file());
    let overview_parts = fs::read_dir(&out)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("context"))
        .count();
    assert!(overview_parts > 1);
}

#[test]
fn invalid_configuration_fails_with_message() {
    let temp = setup_project();
    bundle_cmd(temp.path())
        .args(["--extensions", "py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported extension 'py'"));
}

#[test]
fn malformed_config_file_is_reported() {
    let temp = setup_project();
    write(temp.path(), "context-bundle.toml", "max_files = \"many\"\n");
    bundle_cmd(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("context-bundle.toml"));
}
