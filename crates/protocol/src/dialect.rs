use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Source dialect, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Plain JavaScript (`.js`, `.mjs`, `.cjs`)
    Plain,
    /// TypeScript (`.ts`, `.mts`, `.cts`)
    Typed,
    /// JavaScript with markup (`.jsx`)
    MarkupPlain,
    /// TypeScript with markup (`.tsx`)
    MarkupTyped,
}

/// Every extension the classifier knows how to parse.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// Extensions analyzed when the configuration does not narrow the set.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

impl Dialect {
    /// Detect dialect from a bare extension (no leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Dialect::Plain),
            "ts" | "mts" | "cts" => Some(Dialect::Typed),
            "jsx" => Some(Dialect::MarkupPlain),
            "tsx" => Some(Dialect::MarkupTyped),
            _ => None,
        }
    }

    /// Detect dialect from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Plain => "plain",
            Dialect::Typed => "typed",
            Dialect::MarkupPlain => "markup_plain",
            Dialect::MarkupTyped => "markup_typed",
        }
    }

    /// Type annotations, interfaces and type aliases are part of the grammar
    pub fn is_typed(self) -> bool {
        matches!(self, Dialect::Typed | Dialect::MarkupTyped)
    }

    /// Embedded markup elements are part of the grammar
    pub fn has_markup(self) -> bool {
        matches!(self, Dialect::MarkupPlain | Dialect::MarkupTyped)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered file, relative to the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    /// Relative path with forward slashes
    pub path: String,
    pub dialect: Dialect,
}

impl SourceFile {
    /// Build from a relative path; `None` when the extension is not a known dialect.
    pub fn from_relative(path: impl Into<String>) -> Option<Self> {
        let path = path.into().replace('\\', "/");
        let dialect = Dialect::from_path(&path)?;
        Some(Self { path, dialect })
    }

    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.path).extension().and_then(|ext| ext.to_str())
    }
}
