use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Invalid configuration, rejected before discovery starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unsupported extension '{0}'")]
    UnsupportedExtension(String),

    #[error("max_files must be greater than zero")]
    ZeroMaxFiles,

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("max_chars_per_document {limit} is below the minimum of {minimum}")]
    CharLimitTooSmall { limit: usize, minimum: usize },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] context_discovery::DiscoveryError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] context_assembler::AssemblyError),
}
