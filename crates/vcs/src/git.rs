use crate::porcelain::changed_paths;
use crate::source::VersionControlSource;
use async_trait::async_trait;
use context_protocol::{CommitDescriptor, VersionControlMetadata, WorkingTreeState};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// `git log` format: hash, short hash, subject, author, committer date
const COMMIT_FORMAT: &str = "--format=%H%x00%h%x00%s%x00%an%x00%cI";

/// Repository state read through the `git` binary. Every query is bounded by
/// the timeout; a failed or expired query leaves its field absent.
#[derive(Debug, Clone)]
pub struct GitMetadataCollector {
    root: PathBuf,
    timeout: Duration,
}

impl GitMetadataCollector {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn git(&self, args: &[&str]) -> Option<String> {
        let output = timeout(
            self.timeout,
            Command::new("git")
                .arg("-C")
                .arg(&self.root)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match output {
            Err(_) => {
                log::warn!("git {} timed out after {:?}", args.join(" "), self.timeout);
                None
            }
            Ok(Err(e)) => {
                log::debug!("git {} failed to start: {e}", args.join(" "));
                None
            }
            Ok(Ok(out)) if !out.status.success() => {
                log::debug!(
                    "git {} exited with {}: {}",
                    args.join(" "),
                    out.status,
                    String::from_utf8_lossy(&out.stderr).trim()
                );
                None
            }
            Ok(Ok(out)) => Some(String::from_utf8_lossy(&out.stdout).into_owned()),
        }
    }

    async fn git_line(&self, args: &[&str]) -> Option<String> {
        self.git(args)
            .await
            .map(|out| out.trim().to_string())
            .filter(|out| !out.is_empty())
    }

    async fn branch(&self) -> String {
        if let Some(branch) = self.git_line(&["symbolic-ref", "--short", "-q", "HEAD"]).await {
            return branch;
        }
        match self.git_line(&["rev-parse", "--short", "HEAD"]).await {
            Some(hash) => format!("detached@{hash}"),
            None => "HEAD".to_string(),
        }
    }

    async fn last_commit(&self) -> Option<CommitDescriptor> {
        let raw = self.git_line(&["log", "-1", COMMIT_FORMAT]).await?;
        let mut fields = raw.split('\0');
        let hash = fields.next()?.to_string();
        let short_hash = fields.next()?.to_string();
        let subject = fields.next().unwrap_or_default().to_string();
        let author = fields.next().filter(|s| !s.is_empty()).map(str::to_string);
        let date = fields.next().filter(|s| !s.is_empty()).map(str::to_string);
        Some(CommitDescriptor {
            hash,
            short_hash,
            subject,
            author,
            date,
        })
    }
}

#[async_trait]
impl VersionControlSource for GitMetadataCollector {
    async fn collect(&self) -> Option<VersionControlMetadata> {
        let inside = self
            .git_line(&["rev-parse", "--is-inside-work-tree"])
            .await;
        if inside.as_deref() != Some("true") {
            log::info!("{} is not a git work tree", self.root.display());
            return None;
        }

        let branch = self.branch().await;
        let last_commit = self.last_commit().await;
        let changed_files = self
            .git(&["status", "--porcelain", "-z"])
            .await
            .map(|raw| changed_paths(&raw))
            .unwrap_or_default();
        let origin_url = self.git_line(&["remote", "get-url", "origin"]).await;
        let diff_stat = match last_commit {
            Some(_) => self.git_line(&["diff", "--stat", "HEAD"]).await,
            None => None,
        };

        let state = if changed_files.is_empty() {
            WorkingTreeState::Clean
        } else {
            WorkingTreeState::Dirty
        };
        log::debug!(
            "Repository on {branch}, {} changed files",
            changed_files.len()
        );

        Some(VersionControlMetadata {
            branch,
            last_commit,
            state,
            changed_files,
            origin_url,
            diff_stat,
        })
    }
}
