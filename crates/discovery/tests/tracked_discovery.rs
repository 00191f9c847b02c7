use context_discovery::{FileScanner, ScanMode, ScanOptions};
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

fn git_ok(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .status()
        .expect("git command");
    assert!(status.success(), "git {args:?} failed");
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

#[tokio::test]
async fn tracked_mode_honors_nested_ignore_files() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    git_ok(root, &["init", "-q"]);

    write(root, ".gitignore", "generated/\n");
    write(root, "packages/web/.gitignore", "cache.js\n");
    write(root, "src/app.ts", "export const app = 1;");
    write(root, "generated/client.ts", "export {};");
    write(root, "packages/web/cache.js", "module.exports = {};");
    write(root, "packages/web/index.js", "module.exports = {};");
    write(root, "src/legacy.js", "module.exports = {};");
    git_ok(root, &["add", "src/app.ts"]);

    let scanner = FileScanner::new(
        root,
        ScanOptions {
            prefer_tracked_files: true,
            exclude: vec!["src/legacy.js".into()],
            ..ScanOptions::default()
        },
    );
    let outcome = scanner.scan().await.expect("scan");
    assert_eq!(outcome.mode, ScanMode::Tracked);

    let files: Vec<_> = outcome.files.iter().map(|f| f.path.as_str()).collect();
    assert!(files.contains(&"src/app.ts"), "{files:?}");
    assert!(files.contains(&"packages/web/index.js"), "{files:?}");
    assert!(!files.contains(&"packages/web/cache.js"), "{files:?}");
    assert!(!files.iter().any(|f| f.starts_with("generated/")), "{files:?}");
    assert!(!files.contains(&"src/legacy.js"), "{files:?}");
}

#[tokio::test]
async fn tracked_preference_falls_back_outside_work_tree() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    write(root, "index.js", "module.exports = 1;");

    let scanner = FileScanner::new(
        root,
        ScanOptions {
            prefer_tracked_files: true,
            ..ScanOptions::default()
        },
    );
    let outcome = scanner.scan().await.expect("scan");
    assert_eq!(outcome.mode, ScanMode::Walk);
    assert_eq!(outcome.files.len(), 1);
}

#[tokio::test]
async fn discovered_paths_are_relative_and_unique() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    write(root, "a/b.ts", "");
    write(root, "a/c.tsx", "");

    let outcome = FileScanner::new(root, ScanOptions::default())
        .scan()
        .await
        .expect("scan");
    let mut seen = std::collections::HashSet::new();
    for file in &outcome.files {
        assert!(!Path::new(&file.path).is_absolute());
        assert!(seen.insert(file.path.clone()));
    }
}

#[tokio::test]
async fn expired_git_deadline_falls_back_to_walk() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    git_ok(root, &["init", "-q"]);
    write(root, ".gitignore", "ignored.js\n");
    write(root, "ignored.js", "module.exports = 1;");
    write(root, "kept.js", "module.exports = 2;");

    let scanner = FileScanner::new(
        root,
        ScanOptions {
            prefer_tracked_files: true,
            git_timeout: Duration::ZERO,
            ..ScanOptions::default()
        },
    );
    let outcome = scanner.scan().await.expect("scan");
    assert_eq!(outcome.mode, ScanMode::Walk);

    let files: Vec<_> = outcome.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(files, vec!["ignored.js", "kept.js"]);
}
