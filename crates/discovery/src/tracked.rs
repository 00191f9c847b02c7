use crate::error::{DiscoveryError, Result};
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Run `git -C root args`; `None` when the deadline passes first
async fn git(root: &Path, args: &[&str], limit: Duration) -> Option<std::io::Result<Output>> {
    let run = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .kill_on_drop(true)
        .output();
    match timeout(limit, run).await {
        Ok(output) => Some(output),
        Err(_) => {
            log::warn!("git {} timed out after {limit:?}", args.join(" "));
            None
        }
    }
}

/// True when `root` sits inside a git work tree; an expired query counts as no
pub(crate) async fn is_work_tree(root: &Path, limit: Duration) -> bool {
    let Some(Ok(output)) = git(root, &["rev-parse", "--is-inside-work-tree"], limit).await else {
        return false;
    };
    output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true"
}

/// Tracked files plus untracked files not covered by any ignore file,
/// relative to `root`, in git's order. `None` when the listing timed out.
pub(crate) async fn list_tracked_files(
    root: &Path,
    limit: Duration,
) -> Result<Option<Vec<String>>> {
    let args = ["ls-files", "-z", "--cached", "--others", "--exclude-standard"];
    let Some(output) = git(root, &args, limit).await else {
        return Ok(None);
    };
    let output =
        output.map_err(|e| DiscoveryError::TrackedFiles(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(DiscoveryError::TrackedFiles(if stderr.is_empty() {
            format!("git ls-files exited with {}", output.status)
        } else {
            stderr
        }));
    }

    Ok(Some(
        output
            .stdout
            .split(|b| *b == 0)
            .filter(|token| !token.is_empty())
            .map(|token| String::from_utf8_lossy(token).replace('\\', "/"))
            .collect(),
    ))
}
