//! Primary overview document.

use chrono::NaiveDate;
use context_protocol::{
    FileAnalysisRecord, FrameworkSignal, ProjectManifestInfo, VersionControlMetadata,
    DEPENDENCIES_DOCUMENT, ENDPOINTS_DOCUMENT, FILES_DOCUMENT, FRAMEWORK_DOCUMENT,
    GIT_DIFF_DOCUMENT, STRUCTURE_DOCUMENT,
};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Changed files listed inline before the rest is summarised
const MAX_LISTED_CHANGES: usize = 20;

/// Facts the overview is rendered from
pub(crate) struct Overview<'a> {
    pub manifest: &'a ProjectManifestInfo,
    pub frameworks: &'a [FrameworkSignal],
    pub records: &'a [FileAnalysisRecord],
    pub excluded_files: usize,
    pub vcs: Option<&'a VersionControlMetadata>,
    pub generated_on: NaiveDate,
    /// Secondary document name and the file names of its parts, in bundle order
    pub links: &'a [(String, Vec<String>)],
}

fn describe(document: &str) -> &'static str {
    match document {
        FILES_DOCUMENT => "every analyzed source file, one path per line",
        STRUCTURE_DOCUMENT => "per-file category, imports, exports and classified elements",
        ENDPOINTS_DOCUMENT => "HTTP endpoints with method, path, handler and location",
        DEPENDENCIES_DOCUMENT => "package manager, dependencies and scripts",
        FRAMEWORK_DOCUMENT => "identified frameworks and their detected features",
        GIT_DIFF_DOCUMENT => "diff stat of uncommitted changes at generation time",
        _ => "supplementary data",
    }
}

impl Overview<'_> {
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Project context: {}\n", self.manifest.name);
        let _ = writeln!(out, "Generated on {}.\n", self.generated_on.format("%Y-%m-%d"));

        self.instructions(&mut out);
        self.project(&mut out);
        self.dependencies(&mut out);
        self.documents(&mut out);
        if let Some(vcs) = self.vcs {
            repository(&mut out, vcs);
        }
        out
    }

    fn instructions(&self, out: &mut String) {
        out.push_str("## Reading this bundle\n\n");
        out.push_str("- Start here; the documents linked under **Documents** hold the details.\n");
        let _ = writeln!(
            out,
            "- `{STRUCTURE_DOCUMENT}.json` has one entry per analyzed file. An `endpoints` \
             reference in an entry points at the rows of `{ENDPOINTS_DOCUMENT}.json` whose \
             `file` equals the reference `filter`."
        );
        out.push_str("- A name ending in `_partN` continues the document of the same base name.\n");
        out.push_str(
            "- A document ending in `[... truncated ...]` was cut to fit its size limit; \
             read the source files for the rest.\n",
        );
        out.push_str(
            "- Facts describe the project on the generation date; see **Repository state** \
             (when present) to check for drift.\n\n",
        );
    }

    fn project(&self, out: &mut String) {
        let manifest = self.manifest;
        out.push_str("## Project\n\n");
        let _ = writeln!(out, "- **Name**: {}", manifest.name);
        if let Some(version) = &manifest.version {
            let _ = writeln!(out, "- **Version**: {version}");
        }
        if let Some(description) = &manifest.description {
            let _ = writeln!(out, "- **Description**: {description}");
        }
        let _ = writeln!(out, "- **Package manager**: {}", manifest.package_manager);
        if !manifest.entry_points.is_empty() {
            let entries: Vec<String> = manifest
                .entry_points
                .iter()
                .map(|entry| format!("`{entry}`"))
                .collect();
            let _ = writeln!(out, "- **Entry points**: {}", entries.join(", "));
        }

        if self.frameworks.is_empty() {
            out.push_str("- **Frameworks**: none identified\n");
        } else {
            let frameworks: Vec<String> = self
                .frameworks
                .iter()
                .map(|signal| match &signal.version {
                    Some(version) => format!("{} {version}", signal.name),
                    None => signal.name.clone(),
                })
                .collect();
            let _ = writeln!(out, "- **Frameworks**: {}", frameworks.join(", "));
        }

        let _ = write!(out, "- **Files analyzed**: {}", self.records.len());
        if self.excluded_files > 0 {
            let _ = write!(out, " ({} more excluded by the file limit)", self.excluded_files);
        }
        out.push('\n');
        let endpoints: usize = self.records.iter().map(FileAnalysisRecord::endpoint_count).sum();
        let _ = writeln!(out, "- **Endpoints**: {endpoints}");

        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        for record in self.records {
            *categories.entry(record.category.as_str()).or_default() += 1;
        }
        if !categories.is_empty() {
            out.push_str("\n### Files by category\n\n");
            for (category, count) in categories {
                let _ = writeln!(out, "- {category}: {count}");
            }
        }
        out.push('\n');
    }

    fn dependencies(&self, out: &mut String) {
        let manifest = self.manifest;
        out.push_str("## Dependencies\n\n");
        if manifest.dependencies.is_empty() {
            out.push_str("No runtime dependencies declared.\n");
        }
        for (name, version) in &manifest.dependencies {
            let _ = writeln!(out, "- `{name}` {version}");
        }

        if !manifest.dev_dependencies.is_empty() {
            out.push_str("\n### Development dependencies\n\n");
            for (name, version) in &manifest.dev_dependencies {
                let _ = writeln!(out, "- `{name}` {version}");
            }
        }

        if !manifest.scripts.is_empty() {
            out.push_str("\n### Scripts\n\n");
            for (name, command) in &manifest.scripts {
                let _ = writeln!(
                    out,
                    "- `{name}`: `{command}` (run with `{}`)",
                    manifest.package_manager.run_command(name)
                );
            }
        }
        out.push('\n');
    }

    fn documents(&self, out: &mut String) {
        out.push_str("## Documents\n\n");
        for (name, files) in self.links {
            let Some((first, rest)) = files.split_first() else {
                continue;
            };
            let _ = writeln!(out, "- [{first}]({first}): {}", describe(name));
            for part in rest {
                let _ = writeln!(out, "  - [{part}]({part})");
            }
        }
        out.push('\n');
    }
}

fn repository(out: &mut String, vcs: &VersionControlMetadata) {
    out.push_str("## Repository state\n\n");
    let _ = writeln!(out, "- **Branch**: {}", vcs.branch);
    if let Some(commit) = &vcs.last_commit {
        let _ = write!(out, "- **Commit**: `{}` {}", commit.short_hash, commit.subject);
        match (&commit.author, &commit.date) {
            (Some(author), Some(date)) => {
                let _ = write!(out, " ({author}, {date})");
            }
            (Some(author), None) => {
                let _ = write!(out, " ({author})");
            }
            (None, Some(date)) => {
                let _ = write!(out, " ({date})");
            }
            (None, None) => {}
        }
        out.push('\n');
    }
    if let Some(origin) = &vcs.origin_url {
        let _ = writeln!(out, "- **Origin**: {origin}");
    }

    if vcs.is_dirty() {
        let _ = writeln!(
            out,
            "- **Working tree**: dirty ({} changed files)",
            vcs.changed_files.len()
        );
        for path in vcs.changed_files.iter().take(MAX_LISTED_CHANGES) {
            let _ = writeln!(out, "  - `{path}`");
        }
        let hidden = vcs.changed_files.len().saturating_sub(MAX_LISTED_CHANGES);
        if hidden > 0 {
            let _ = writeln!(out, "  - … and {hidden} more");
        }
    } else {
        out.push_str("- **Working tree**: clean\n");
    }

    out.push_str("\n### Detecting drift\n\n");
    out.push_str("Run these from the project root before trusting this bundle:\n\n");
    match &vcs.last_commit {
        Some(commit) => {
            let _ = writeln!(
                out,
                "- `git log --oneline {}..HEAD` lists commits made since generation.",
                commit.hash
            );
            let _ = writeln!(
                out,
                "- `git diff --stat {}` shows files changed since generation.",
                commit.hash
            );
        }
        None => {
            out.push_str("- `git log --oneline` lists commits; none existed at generation.\n");
        }
    }
    out.push_str("- `git status --porcelain` shows the current uncommitted changes.\n");
    out.push_str(
        "\nIf any of these differ from the state above, prefer the source files over this \
         bundle for the affected paths.\n",
    );
}
