use crate::error::{DiscoveryError, Result};
use crate::patterns::{ExcludeMatcher, IncludeMatcher};
use crate::tracked;
use context_protocol::{Diagnostic, SourceFile};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB
const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Discovery options supplied by the configuration layer
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Include globs; empty admits everything
    pub include: Vec<String>,
    /// Exclude globs with gitignore semantics
    pub exclude: Vec<String>,
    /// Extensions to keep (no leading dot); `None` keeps every known dialect
    pub extensions: Option<Vec<String>>,
    /// List files through git when the root is a work tree
    pub prefer_tracked_files: bool,
    /// Depth limit for the directory walk (root entries are depth 1)
    pub max_depth: Option<usize>,
    /// Deadline for each git query in tracked mode
    pub git_timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            extensions: None,
            prefer_tracked_files: false,
            max_depth: None,
            git_timeout: DEFAULT_GIT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Tracked,
    Walk,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub files: Vec<SourceFile>,
    pub mode: ScanMode,
    pub diagnostics: Vec<Diagnostic>,
}

/// Scanner for finding source files in a project
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate candidate files. Fails only when the root itself cannot be
    /// enumerated; unreadable sub-entries become diagnostics.
    pub async fn scan(&self) -> Result<ScanOutcome> {
        self.check_root()?;

        let exclude = ExcludeMatcher::new(&self.root, &self.options.exclude)?;
        let include = IncludeMatcher::new(&self.options.include)?;
        let mut diagnostics = Vec::new();

        let (mode, candidates) = match self.tracked_candidates().await? {
            Some(listed) => (ScanMode::Tracked, listed),
            None => (ScanMode::Walk, self.walk(&exclude, &mut diagnostics)),
        };

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for rel in candidates {
            if !seen.insert(rel.clone()) {
                continue;
            }
            if exclude.is_excluded(&rel, false) || !include.is_included(&rel) {
                continue;
            }
            let Some(file) = SourceFile::from_relative(rel) else {
                continue;
            };
            if !self.extension_allowed(&file) {
                continue;
            }

            let abs = self.root.join(&file.path);
            match fs::metadata(&abs) {
                Ok(meta) if !meta.is_file() => continue,
                Ok(meta) if meta.len() > MAX_FILE_SIZE_BYTES => {
                    log::debug!(
                        "Skipping large file {} ({} bytes > {})",
                        file.path,
                        meta.len(),
                        MAX_FILE_SIZE_BYTES
                    );
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    // Tracked listings may name files deleted from the work tree
                    log::debug!("Skipping missing file {}: {e}", file.path);
                    continue;
                }
            }

            files.push(file);
        }

        log::info!(
            "Found {} source files ({})",
            files.len(),
            match mode {
                ScanMode::Tracked => "tracked",
                ScanMode::Walk => "walk",
            }
        );

        Ok(ScanOutcome {
            files,
            mode,
            diagnostics,
        })
    }

    /// Git's listing when tracked mode applies; `None` selects the walk
    async fn tracked_candidates(&self) -> Result<Option<Vec<String>>> {
        let limit = self.options.git_timeout;
        if !self.options.prefer_tracked_files || !tracked::is_work_tree(&self.root, limit).await {
            return Ok(None);
        }
        let listed = tracked::list_tracked_files(&self.root, limit).await?;
        if listed.is_none() {
            log::warn!("Falling back to directory walk for {}", self.root.display());
        }
        Ok(listed)
    }

    fn check_root(&self) -> Result<()> {
        let meta = fs::metadata(&self.root).map_err(|source| DiscoveryError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(DiscoveryError::RootUnreadable {
                path: self.root.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        fs::read_dir(&self.root).map_err(|source| DiscoveryError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;
        Ok(())
    }

    /// Depth-first walk in file-name order, hidden entries skipped
    fn walk(&self, exclude: &ExcludeMatcher, diagnostics: &mut Vec<Diagnostic>) -> Vec<String> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let prune = exclude.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .max_depth(self.options.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && prune.is_excluded(&relative_path(entry.path(), &root), true))
        });

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }
                    files.push(relative_path(entry.path(), &self.root));
                }
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    diagnostics.push(Diagnostic::unreadable_entry(error_path(&e), &e));
                }
            }
        }

        files
    }

    fn extension_allowed(&self, file: &SourceFile) -> bool {
        let Some(allowed) = &self.options.extensions else {
            return true;
        };
        let Some(ext) = file.extension() else {
            return false;
        };
        allowed
            .iter()
            .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn error_path(err: &ignore::Error) -> String {
    match err {
        ignore::Error::WithPath { path, .. } => path.display().to_string(),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => "<unknown>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{FileScanner, ScanMode, ScanOptions};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &std::path::Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    async fn paths(scanner: &FileScanner) -> Vec<String> {
        scanner
            .scan()
            .await
            .unwrap()
            .files
            .into_iter()
            .map(|f| f.path)
            .collect()
    }

    #[tokio::test]
    async fn walk_omits_excluded_dependency_directory() {
        let temp = tempdir().unwrap();
        write(temp.path(), "src/index.js", "export default 1;");
        write(temp.path(), "node_modules/pkg/index.js", "module.exports = 1;");
        write(temp.path(), "node_modules/pkg/lib/deep.js", "module.exports = 2;");

        let scanner = FileScanner::new(
            temp.path(),
            ScanOptions {
                exclude: vec!["node_modules/**".into()],
                ..ScanOptions::default()
            },
        );
        let outcome = scanner.scan().await.unwrap();
        assert_eq!(outcome.mode, ScanMode::Walk);
        let files: Vec<_> = outcome.files.into_iter().map(|f| f.path).collect();
        assert_eq!(files, vec!["src/index.js".to_string()]);
    }

    #[tokio::test]
    async fn walk_is_depth_first_and_sorted() {
        let temp = tempdir().unwrap();
        write(temp.path(), "b.ts", "");
        write(temp.path(), "a/z.ts", "");
        write(temp.path(), "a/m/x.ts", "");
        write(temp.path(), "c.tsx", "");

        let scanner = FileScanner::new(temp.path(), ScanOptions::default());
        assert_eq!(
            paths(&scanner).await,
            vec!["a/m/x.ts", "a/z.ts", "b.ts", "c.tsx"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn walk_skips_hidden_entries_and_respects_depth() {
        let temp = tempdir().unwrap();
        write(temp.path(), ".hidden/secret.js", "");
        write(temp.path(), ".eslintrc.js", "");
        write(temp.path(), "top.js", "");
        write(temp.path(), "one/two/three.js", "");

        let scanner = FileScanner::new(
            temp.path(),
            ScanOptions {
                max_depth: Some(2),
                ..ScanOptions::default()
            },
        );
        assert_eq!(paths(&scanner).await, vec!["top.js".to_string()]);
    }

    #[tokio::test]
    async fn extension_filter_and_unknown_dialects() {
        let temp = tempdir().unwrap();
        write(temp.path(), "a.ts", "");
        write(temp.path(), "b.js", "");
        write(temp.path(), "README.md", "");

        let scanner = FileScanner::new(
            temp.path(),
            ScanOptions {
                extensions: Some(vec![".ts".into()]),
                ..ScanOptions::default()
            },
        );
        assert_eq!(paths(&scanner).await, vec!["a.ts".to_string()]);
    }

    #[tokio::test]
    async fn missing_root_is_fatal() {
        let temp = tempdir().unwrap();
        let scanner = FileScanner::new(temp.path().join("nope"), ScanOptions::default());
        assert!(scanner.scan().await.is_err());
    }
}
