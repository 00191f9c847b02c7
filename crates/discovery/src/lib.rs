//! # Context Discovery
//!
//! Produces the ordered list of candidate source files for a root directory.
//!
//! ```text
//! Root
//!     │
//!     ├──> git work tree + tracked mode?
//!     │      ├─ yes: git ls-files (every nested ignore file honored)
//!     │      └─ no, or git past its deadline:
//!     │             depth-first walk (hidden skipped, max depth)
//!     │
//!     └──> Filters
//!            ├─ exclude globs (gitignore semantics)
//!            ├─ include globs
//!            └─ dialect extensions
//! ```
//!
//! Root enumeration failures are fatal; unreadable sub-entries are reported
//! as diagnostics and skipped.

mod error;
mod patterns;
mod scanner;
mod tracked;

pub use error::{DiscoveryError, Result};
pub use patterns::{ExcludeMatcher, IncludeMatcher};
pub use scanner::{FileScanner, ScanMode, ScanOptions, ScanOutcome};
