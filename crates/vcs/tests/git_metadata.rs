use context_protocol::WorkingTreeState;
use context_vcs::{GitMetadataCollector, NoVersionControl, VersionControlSource};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

async fn git_ok(repo: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .await
        .expect("git command");
    assert!(out.status.success(), "git {:?} failed", args);
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

async fn init_repo(repo: &Path) {
    git_ok(repo, &["init", "-q"]).await;
    git_ok(repo, &["symbolic-ref", "HEAD", "refs/heads/trunk"]).await;
    git_ok(repo, &["config", "user.email", "test@example.com"]).await;
    git_ok(repo, &["config", "user.name", "Test"]).await;
    git_ok(repo, &["config", "commit.gpgsign", "false"]).await;
}

#[tokio::test]
async fn clean_repository_with_commit() {
    let temp = tempfile::tempdir().unwrap();
    let repo = temp.path();
    init_repo(repo).await;
    std::fs::write(repo.join("index.js"), "module.exports = 1;\n").unwrap();
    git_ok(repo, &["add", "."]).await;
    git_ok(repo, &["commit", "-q", "-m", "initial import"]).await;
    git_ok(
        repo,
        &["remote", "add", "origin", "https://example.com/acme/shop.git"],
    )
    .await;
    let head = git_ok(repo, &["rev-parse", "HEAD"]).await;

    let meta = GitMetadataCollector::new(repo)
        .collect()
        .await
        .expect("metadata");
    assert_eq!(meta.branch, "trunk");
    assert_eq!(meta.state, WorkingTreeState::Clean);
    assert!(meta.changed_files.is_empty());
    assert_eq!(
        meta.origin_url.as_deref(),
        Some("https://example.com/acme/shop.git")
    );
    assert_eq!(meta.diff_content(), None);

    let commit = meta.last_commit.expect("commit");
    assert_eq!(commit.hash, head);
    assert!(head.starts_with(&commit.short_hash));
    assert_eq!(commit.subject, "initial import");
    assert_eq!(commit.author.as_deref(), Some("Test"));
    assert!(commit.date.is_some());
}

#[tokio::test]
async fn dirty_repository_reports_changes_and_diff_stat() {
    let temp = tempfile::tempdir().unwrap();
    let repo = temp.path();
    init_repo(repo).await;
    std::fs::write(repo.join("app.ts"), "export const a = 1;\n").unwrap();
    git_ok(repo, &["add", "."]).await;
    git_ok(repo, &["commit", "-q", "-m", "c1"]).await;

    std::fs::write(repo.join("app.ts"), "export const a = 2;\n").unwrap();
    std::fs::write(repo.join("new.ts"), "export {};\n").unwrap();

    let meta = GitMetadataCollector::new(repo).collect().await.unwrap();
    assert!(meta.is_dirty());
    assert_eq!(meta.changed_files, vec!["app.ts", "new.ts"]);
    assert!(meta.origin_url.is_none());
    let stat = meta.diff_content().expect("diff stat");
    assert!(stat.contains("app.ts"), "{stat}");
}

#[tokio::test]
async fn repository_without_commits_has_branch_only() {
    let temp = tempfile::tempdir().unwrap();
    init_repo(temp.path()).await;

    let meta = GitMetadataCollector::new(temp.path()).collect().await.unwrap();
    assert_eq!(meta.branch, "trunk");
    assert!(meta.last_commit.is_none());
    assert!(meta.diff_stat.is_none());
}

#[tokio::test]
async fn non_repository_and_expired_queries_yield_nothing() {
    let temp = tempfile::tempdir().unwrap();
    assert!(GitMetadataCollector::new(temp.path()).collect().await.is_none());

    init_repo(temp.path()).await;
    let expired = GitMetadataCollector::new(temp.path()).with_timeout(Duration::ZERO);
    assert!(expired.collect().await.is_none());

    assert!(NoVersionControl.collect().await.is_none());
}
