use crate::element::{ClassifiedElement, Endpoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single resolved category of a file, used for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Endpoint,
    Middleware,
    Model,
    Service,
    Component,
    Config,
    Test,
    Utility,
}

impl FileCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Endpoint => "endpoint",
            FileCategory::Middleware => "middleware",
            FileCategory::Model => "model",
            FileCategory::Service => "service",
            FileCategory::Component => "component",
            FileCategory::Config => "config",
            FileCategory::Test => "test",
            FileCategory::Utility => "utility",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result for one discovered file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysisRecord {
    pub path: String,
    pub category: FileCategory,
    /// Module specifiers, in document order
    pub imports: Vec<String>,
    /// Exported names; default exports appear as `default`
    pub exports: Vec<String>,
    /// Top-level function names
    pub functions: Vec<String>,
    /// Top-level class names
    pub classes: Vec<String>,
    pub elements: Vec<ClassifiedElement>,
}

impl FileAnalysisRecord {
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.elements.iter().filter_map(ClassifiedElement::as_endpoint)
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints().count()
    }
}
