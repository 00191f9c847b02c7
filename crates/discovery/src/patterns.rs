use crate::error::{DiscoveryError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Exclude rules with gitignore semantics: later `!` lines re-include,
/// directory patterns cover everything below them.
#[derive(Clone)]
pub struct ExcludeMatcher {
    matcher: Gitignore,
}

impl ExcludeMatcher {
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            builder
                .add_line(None, pattern)
                .map_err(|source| DiscoveryError::InvalidExclude {
                    pattern: pattern.to_string(),
                    source,
                })?;
        }
        let matcher = builder
            .build()
            .map_err(|source| DiscoveryError::InvalidExclude {
                pattern: patterns.join(", "),
                source,
            })?;
        Ok(Self { matcher })
    }

    /// `rel_path` is relative to the root, forward slashes
    pub fn is_excluded(&self, rel_path: &str, is_dir: bool) -> bool {
        if rel_path.is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }
}

/// Include globs; an empty set admits every path. A pattern without glob
/// characters is a path prefix (`src` admits `src/**`).
pub struct IncludeMatcher {
    set: Option<GlobSet>,
}

impl IncludeMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut any = false;
        for raw in patterns {
            let pattern = normalize_include(raw);
            if pattern.is_empty() {
                continue;
            }
            let expanded = if has_glob_chars(&pattern) {
                vec![pattern.clone()]
            } else {
                vec![pattern.clone(), format!("{pattern}/**")]
            };
            for glob in expanded {
                let glob = GlobBuilder::new(&glob)
                    .literal_separator(true)
                    .build()
                    .map_err(|source| DiscoveryError::InvalidInclude {
                        pattern: raw.clone(),
                        source,
                    })?;
                builder.add(glob);
                any = true;
            }
        }

        if !any {
            return Ok(Self { set: None });
        }
        let set = builder
            .build()
            .map_err(|source| DiscoveryError::InvalidInclude {
                pattern: patterns.join(", "),
                source,
            })?;
        Ok(Self { set: Some(set) })
    }

    pub fn is_included(&self, rel_path: &str) -> bool {
        self.set.as_ref().map_or(true, |set| set.is_match(rel_path))
    }
}

fn normalize_include(raw: &str) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while let Some(rest) = value.strip_prefix("./") {
        value = rest.to_string();
    }
    let value = value.trim_end_matches('/');
    if value == "." {
        return String::new();
    }
    value.to_string()
}

fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn exclude_matches_everything_below_directory_glob() {
        let matcher =
            ExcludeMatcher::new(Path::new("/repo"), &strings(&["node_modules/**"])).unwrap();
        assert!(matcher.is_excluded("node_modules/pkg/index.js", false));
        assert!(!matcher.is_excluded("src/index.js", false));
    }

    #[test]
    fn later_negation_reincludes() {
        let matcher = ExcludeMatcher::new(
            Path::new("/repo"),
            &strings(&["generated/**", "!generated/keep.ts"]),
        )
        .unwrap();
        assert!(matcher.is_excluded("generated/drop.ts", false));
        assert!(!matcher.is_excluded("generated/keep.ts", false));
    }

    #[test]
    fn bare_directory_pattern_matches_at_any_depth() {
        let matcher = ExcludeMatcher::new(Path::new("/repo"), &strings(&["dist/"])).unwrap();
        assert!(matcher.is_excluded("dist", true));
        assert!(matcher.is_excluded("packages/web/dist/bundle.js", false));
    }

    #[test]
    fn include_prefix_and_glob() {
        let matcher = IncludeMatcher::new(&strings(&["src", "lib/*.ts"])).unwrap();
        assert!(matcher.is_included("src/a/b.ts"));
        assert!(matcher.is_included("lib/x.ts"));
        assert!(!matcher.is_included("lib/nested/x.ts"));
        assert!(!matcher.is_included("test/x.ts"));
    }

    #[test]
    fn empty_include_admits_all() {
        let matcher = IncludeMatcher::new(&strings(&["", "./"])).unwrap();
        assert!(matcher.is_included("anything/at/all.js"));
    }
}
