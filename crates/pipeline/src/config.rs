use crate::error::ConfigError;
use context_assembler::{
    AssemblyOptions, SizeLimits, TruncationStrategy, DEFAULT_MAX_CHARS, DEFAULT_MAX_FILES,
};
use context_discovery::ScanOptions;
use context_protocol::{DEFAULT_EXTENSIONS, SUPPORTED_EXTENSIONS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the project root when no config path is given
pub const CONFIG_FILE: &str = "context-bundle.toml";

/// Smallest accepted char limit; leaves room for markers plus some content
pub const MIN_CHARS_PER_DOCUMENT: usize = 64;

const DEFAULT_GIT_TIMEOUT_MS: u64 = 5_000;

const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules/**",
    "dist/**",
    "build/**",
    "coverage/**",
    "out/**",
    ".next/**",
    ".nuxt/**",
    ".svelte-kit/**",
    "vendor/**",
];

/// Settings of one run, from `context-bundle.toml` plus CLI overrides
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_depth: Option<usize>,
    pub extensions: Vec<String>,
    pub prefer_tracked_files: bool,
    pub include_git_metadata: bool,
    pub max_files: usize,
    pub max_lines_per_document: Option<usize>,
    pub max_chars_per_document: Option<usize>,
    pub strategy: TruncationStrategy,
    pub inline_endpoints: bool,
    pub git_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include: Vec::new(),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            max_depth: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            prefer_tracked_files: true,
            include_git_metadata: true,
            max_files: DEFAULT_MAX_FILES,
            max_lines_per_document: None,
            max_chars_per_document: Some(DEFAULT_MAX_CHARS),
            strategy: TruncationStrategy::Truncate,
            inline_endpoints: false,
            git_timeout_ms: DEFAULT_GIT_TIMEOUT_MS,
        }
    }
}

impl PipelineConfig {
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parse a TOML config file; absent keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `context-bundle.toml` from `root` when present, defaults otherwise.
    /// The root always wins over a `root` key in the file.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let candidate = root.join(CONFIG_FILE);
        let mut config = if candidate.is_file() {
            log::debug!("Loading config from {}", candidate.display());
            Self::load(&candidate)?
        } else {
            Self::default()
        };
        config.root = root.to_path_buf();
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for ext in &self.extensions {
            let bare = ext.trim_start_matches('.').to_ascii_lowercase();
            if !SUPPORTED_EXTENSIONS.contains(&bare.as_str()) {
                return Err(ConfigError::UnsupportedExtension(ext.clone()));
            }
        }
        if self.max_files == 0 {
            return Err(ConfigError::ZeroMaxFiles);
        }
        if self.max_lines_per_document == Some(0) {
            return Err(ConfigError::ZeroLimit("max_lines_per_document"));
        }
        match self.max_chars_per_document {
            Some(0) => return Err(ConfigError::ZeroLimit("max_chars_per_document")),
            Some(limit) if limit < MIN_CHARS_PER_DOCUMENT => {
                return Err(ConfigError::CharLimitTooSmall {
                    limit,
                    minimum: MIN_CHARS_PER_DOCUMENT,
                })
            }
            _ => {}
        }
        Ok(())
    }

    pub fn scan_options(&self) -> ScanOptions {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        ScanOptions {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            extensions: Some(extensions),
            prefer_tracked_files: self.prefer_tracked_files,
            max_depth: self.max_depth,
            git_timeout: self.git_timeout(),
        }
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            max_files: self.max_files,
            limits: SizeLimits {
                max_lines: self.max_lines_per_document,
                max_chars: self.max_chars_per_document,
                strategy: self.strategy,
            },
            inline_endpoints: self.inline_endpoints,
        }
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_millis(self.git_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.git_timeout(), Duration::from_secs(5));
        assert_eq!(config.scan_options().git_timeout, config.git_timeout());
        assert!(config.exclude.contains(&"node_modules/**".to_string()));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            max_files = 50
            strategy = "split"
            max_lines_per_document = 400
            exclude = ["fixtures/**"]
            "#,
        )
        .unwrap();
        assert_eq!(config.max_files, 50);
        assert_eq!(config.strategy, TruncationStrategy::Split);
        assert_eq!(config.exclude, vec!["fixtures/**".to_string()]);
        assert_eq!(config.max_chars_per_document, Some(DEFAULT_MAX_CHARS));
        assert!(config.include_git_metadata);
    }

    #[test]
    fn unknown_keys_and_bad_values_are_malformed() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);

        fs::write(&path, "max_file = 3\n").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::Malformed { .. })
        ));

        fs::write(&path, "strategy = \"squash\"\n").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn discover_reads_root_file_and_pins_root() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "root = \"/elsewhere\"\ninline_endpoints = true\n",
        )
        .unwrap();
        let config = PipelineConfig::discover(temp.path()).unwrap();
        assert_eq!(config.root, temp.path());
        assert!(config.inline_endpoints);

        let empty = tempdir().unwrap();
        assert_eq!(
            PipelineConfig::discover(empty.path()).unwrap(),
            PipelineConfig::for_root(empty.path())
        );
    }

    #[test]
    fn validation_rejects_bad_limits_and_extensions() {
        let invalid = [
            PipelineConfig {
                extensions: vec!["py".into()],
                ..PipelineConfig::default()
            },
            PipelineConfig {
                max_files: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                max_lines_per_document: Some(0),
                ..PipelineConfig::default()
            },
            PipelineConfig {
                max_chars_per_document: Some(0),
                ..PipelineConfig::default()
            },
            PipelineConfig {
                max_chars_per_document: Some(20),
                ..PipelineConfig::default()
            },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{config:?}");
        }

        let dotted = PipelineConfig {
            extensions: vec![".TS".into()],
            ..PipelineConfig::default()
        };
        dotted.validate().unwrap();
        assert_eq!(dotted.scan_options().extensions, Some(vec!["ts".to_string()]));

        let module_variants = PipelineConfig {
            extensions: vec!["mts".into(), "cts".into()],
            ..PipelineConfig::default()
        };
        module_variants.validate().unwrap();
    }
}
