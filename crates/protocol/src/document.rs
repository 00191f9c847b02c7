use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PRIMARY_DOCUMENT: &str = "context";
pub const FILES_DOCUMENT: &str = "files";
pub const STRUCTURE_DOCUMENT: &str = "structure";
pub const ENDPOINTS_DOCUMENT: &str = "endpoints";
pub const DEPENDENCIES_DOCUMENT: &str = "dependencies";
pub const FRAMEWORK_DOCUMENT: &str = "framework";
pub const GIT_DIFF_DOCUMENT: &str = "git_diff";

/// Fixed order in which secondary documents are built and linked
pub const SECONDARY_DOCUMENTS: &[&str] = &[
    FILES_DOCUMENT,
    STRUCTURE_DOCUMENT,
    ENDPOINTS_DOCUMENT,
    DEPENDENCIES_DOCUMENT,
    FRAMEWORK_DOCUMENT,
    GIT_DIFF_DOCUMENT,
];

/// Appended to content cut by the `truncate` strategy
pub const TRUNCATION_MARKER: &str = "\n\n[... truncated ...]";

pub fn part_marker(index: usize, total: usize) -> String {
    format!("\n\n[part {index} of {total}]")
}

/// Name of the `index`-th (1-based) part of a split document
pub fn part_name(base: &str, index: usize) -> String {
    if index <= 1 {
        base.to_string()
    } else {
        format!("{base}_part{index}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Markdown,
    PlainText,
    Json,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Markdown => "md",
            DocumentFormat::PlainText => "txt",
            DocumentFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPart {
    /// 1-based
    pub index: usize,
    pub total: usize,
}

/// Named payload of a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub name: String,
    pub format: DocumentFormat,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<DocumentPart>,
}

impl ContextDocument {
    pub fn new(name: impl Into<String>, format: DocumentFormat, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format,
            content: content.into(),
            part: None,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format.extension())
    }

    /// Content without the part marker
    pub fn body(&self) -> &str {
        match self.part {
            Some(part) => {
                let marker = part_marker(part.index, part.total);
                self.content
                    .strip_suffix(marker.as_str())
                    .unwrap_or(&self.content)
            }
            None => &self.content,
        }
    }
}

/// Pointer from one document into rows of another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    /// Name of the referenced document
    pub target: String,
    /// Value the referenced rows are filtered on
    pub filter: String,
    pub count: usize,
}

impl DocumentReference {
    pub fn new(target: impl Into<String>, filter: impl Into<String>, count: usize) -> Self {
        Self {
            target: target.into(),
            filter: filter.into(),
            count,
        }
    }

    /// A reference only resolves when its target is part of the bundle
    pub fn resolves_in(&self, bundle: &ContextBundle) -> bool {
        bundle.secondary.contains_key(&self.target)
    }
}

/// Primary overview plus secondary documents of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    /// Primary overview, more than one entry only when split
    pub primary: Vec<ContextDocument>,
    /// Secondary document name -> ordered parts
    pub secondary: BTreeMap<String, Vec<ContextDocument>>,
}

impl ContextBundle {
    pub fn get(&self, name: &str) -> Option<&[ContextDocument]> {
        if name == PRIMARY_DOCUMENT {
            return Some(&self.primary);
        }
        self.secondary.get(name).map(Vec::as_slice)
    }

    /// Concatenated bodies of every part of a document
    pub fn joined(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|parts| parts.iter().map(ContextDocument::body).collect())
    }

    /// Every document part: primary first, then secondary documents in fixed order
    pub fn documents(&self) -> impl Iterator<Item = &ContextDocument> {
        let secondary = SECONDARY_DOCUMENTS
            .iter()
            .filter_map(|name| self.secondary.get(*name))
            .flatten();
        self.primary.iter().chain(secondary)
    }
}
