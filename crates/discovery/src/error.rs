use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Fatal discovery failures; no partial file list is returned
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Cannot read root directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tracked file listing failed: {0}")]
    TrackedFiles(String),

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidInclude {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
