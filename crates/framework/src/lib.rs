//! # Context Framework
//!
//! Reads the project manifest (`package.json`) and infers which application
//! frameworks are in use.
//!
//! ```text
//! package.json ──> ProjectManifestInfo ──┐
//!                                        ├──> FrameworkInferer ──> [FrameworkSignal]
//! endpoint tags (fallback vote) ─────────┘
//! ```

mod catalog;
mod error;
mod infer;
mod manifest;

pub use catalog::{FrameworkDescriptor, CATALOG};
pub use error::{ManifestError, Result};
pub use infer::FrameworkInferer;
pub use manifest::{directory_name, load_manifest, MANIFEST_FILE};
