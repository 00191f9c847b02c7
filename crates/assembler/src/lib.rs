//! # Context Assembler
//!
//! Turns per-file records and project facts into a size-bounded bundle of
//! cross-referenced documents.
//!
//! ```text
//! records ──┬─► files.txt
//!           ├─► structure.json ──(endpoints ref)──► endpoints.json
//! manifest ─┼─► dependencies.json
//! signals ──┼─► framework.md
//! vcs ──────┴─► git_diff.txt
//!                      │
//!                      ▼
//!               context.md (links to every part)
//! ```
//!
//! Every document is bounded by [`SizeLimits`]: cut with a marker, or split
//! into `name`, `name_part2`, … parts.

mod assembler;
mod documents;
mod error;
mod limits;
mod overview;

pub use assembler::{
    AssembledContext, AssemblyInput, AssemblyOptions, ContextAssembler, DEFAULT_MAX_CHARS,
    DEFAULT_MAX_FILES,
};
pub use error::{AssemblyError, Result};
pub use limits::{split, truncate, Bounded, SizeLimits, TruncationStrategy};
