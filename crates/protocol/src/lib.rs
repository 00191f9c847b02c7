//! # Context Protocol
//!
//! Shared data model of the context bundle pipeline: discovered files,
//! classified elements, per-file records, manifest facts, framework signals,
//! version-control metadata, documents and diagnostics.

mod diagnostic;
mod dialect;
mod document;
mod element;
mod framework;
mod manifest;
mod record;
mod vcs;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use dialect::{Dialect, SourceFile, DEFAULT_EXTENSIONS, SUPPORTED_EXTENSIONS};
pub use document::{
    part_marker, part_name, ContextBundle, ContextDocument, DocumentFormat, DocumentPart,
    DocumentReference, DEPENDENCIES_DOCUMENT, ENDPOINTS_DOCUMENT, FILES_DOCUMENT,
    FRAMEWORK_DOCUMENT, GIT_DIFF_DOCUMENT, PRIMARY_DOCUMENT, SECONDARY_DOCUMENTS,
    STRUCTURE_DOCUMENT, TRUNCATION_MARKER,
};
pub use element::{
    ClassifiedElement, Component, ComponentKind, ConfigObject, ElementCategory, Endpoint,
    Middleware, Model, ModelKind, Service, Utility,
};
pub use framework::{DetectionSource, FrameworkSignal};
pub use manifest::{PackageManager, ProjectManifestInfo};
pub use record::{FileAnalysisRecord, FileCategory};
pub use vcs::{CommitDescriptor, VersionControlMetadata, WorkingTreeState};

pub fn serialize_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
