//! # Context VCS
//!
//! Optional repository metadata (branch, last commit, working tree state,
//! origin, diff stat) collected through the `git` binary with a per-query
//! timeout. Anything that cannot be read is left out.

mod git;
mod porcelain;
mod source;

pub use git::{GitMetadataCollector, DEFAULT_GIT_TIMEOUT};
pub use source::{NoVersionControl, VersionControlSource};
