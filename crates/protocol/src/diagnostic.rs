use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnreadableEntry { path: String },
    ParseFailure { path: String },
    FilesExcluded { kept: usize, excluded: usize },
    DocumentTruncated { document: String, limit: usize },
    DocumentSplit { document: String, parts: usize },
    ManifestUnavailable,
    VersionControlUnavailable,
}

/// Recoverable condition reported next to a result instead of being printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            kind,
            message: message.into(),
        }
    }

    pub fn unreadable_entry(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        let path = path.into();
        let message = format!("skipped unreadable entry {path}: {reason}");
        Self::warning(DiagnosticKind::UnreadableEntry { path }, message)
    }

    pub fn parse_failure(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        let path = path.into();
        let message = format!("skipped {path}: {reason}");
        Self::warning(DiagnosticKind::ParseFailure { path }, message)
    }

    pub fn files_excluded(kept: usize, excluded: usize) -> Self {
        Self::warning(
            DiagnosticKind::FilesExcluded { kept, excluded },
            format!("file limit reached: kept {kept} files, excluded {excluded}"),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
