//! `context-bundle`: analyze a JavaScript/TypeScript project and write a
//! context bundle for AI assistants.

mod writer;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use context_assembler::TruncationStrategy;
use context_pipeline::{ContextPipeline, PipelineConfig, PipelineOutput};
use context_protocol::{serialize_json, Diagnostic, Severity};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

pub use writer::write_bundle;

/// Output directory under the project root when `--output` is absent
pub const DEFAULT_OUTPUT_DIR: &str = ".context-bundle";

#[derive(Parser)]
#[command(name = "context-bundle")]
#[command(about = "Generate an AI-ready context bundle for a JS/TS project", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project root
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Config file (default: context-bundle.toml in the root when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (default: <root>/.context-bundle)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include glob; repeat for more
    #[arg(long)]
    include: Vec<String>,

    /// Exclude glob, added to the configured ones; repeat for more
    #[arg(long)]
    exclude: Vec<String>,

    /// Extensions to analyze, comma-separated
    #[arg(long, value_delimiter = ',')]
    extensions: Vec<String>,

    /// Directory depth limit of the fallback walk
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum number of files in the bundle
    #[arg(long)]
    max_files: Option<usize>,

    /// Maximum lines per document
    #[arg(long)]
    max_lines: Option<usize>,

    /// Maximum characters per document
    #[arg(long)]
    max_chars: Option<usize>,

    /// What to do with oversized documents
    #[arg(long, value_enum)]
    strategy: Option<StrategyFlag>,

    /// Embed endpoint rows in structure.json
    #[arg(long)]
    inline_endpoints: bool,

    /// Skip version-control metadata
    #[arg(long)]
    no_git: bool,

    /// Walk the directory even inside a git work tree
    #[arg(long)]
    no_tracked: bool,

    /// Timeout for each git query, in milliseconds
    #[arg(long)]
    git_timeout_ms: Option<u64>,

    /// Print a JSON run summary to stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum StrategyFlag {
    Truncate,
    Split,
}

impl StrategyFlag {
    const fn as_domain(self) -> TruncationStrategy {
        match self {
            StrategyFlag::Truncate => TruncationStrategy::Truncate,
            StrategyFlag::Split => TruncationStrategy::Split,
        }
    }
}

#[derive(Serialize)]
struct RunSummary<'a> {
    output: &'a Path,
    files_discovered: usize,
    files_analyzed: usize,
    documents: Vec<String>,
    diagnostics: &'a [Diagnostic],
}

impl Cli {
    /// File config (explicit or discovered) with flags applied on top
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = PipelineConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                config.root = self.root.clone();
                config
            }
            None => PipelineConfig::discover(&self.root)
                .context("Failed to load context-bundle.toml")?,
        };

        if !self.include.is_empty() {
            config.include = self.include.clone();
        }
        config.exclude.extend(self.exclude.iter().cloned());
        if !self.extensions.is_empty() {
            config.extensions = self.extensions.clone();
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        if let Some(max_files) = self.max_files {
            config.max_files = max_files;
        }
        if self.max_lines.is_some() {
            config.max_lines_per_document = self.max_lines;
        }
        if self.max_chars.is_some() {
            config.max_chars_per_document = self.max_chars;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.as_domain();
        }
        if self.inline_endpoints {
            config.inline_endpoints = true;
        }
        if self.no_git {
            config.include_git_metadata = false;
        }
        if self.no_tracked {
            config.prefer_tracked_files = false;
        }
        if let Some(timeout) = self.git_timeout_ms {
            config.git_timeout_ms = timeout;
        }
        Ok(config)
    }

    fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_OUTPUT_DIR))
    }
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.json {
        // stdout is reserved for the summary
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = cli.resolve_config()?;
    let config = exclude_bundle_dir(config, &cli.output_dir());

    let pipeline = ContextPipeline::new(config).context("Invalid configuration")?;
    let output = pipeline
        .run()
        .await
        .context("Failed to build context bundle")?;

    let dir = cli.output_dir();
    let written = write_bundle(&output.bundle, &dir)?;
    report(&cli, &dir, &output, &written)
}

/// Keep earlier bundles written inside the root out of the analysis
fn exclude_bundle_dir(mut config: PipelineConfig, output: &Path) -> PipelineConfig {
    if let Some(pattern) = bundle_pattern(&config.root, output) {
        if !config.exclude.contains(&pattern) {
            config.exclude.push(pattern);
        }
    }
    config
}

/// Exclude glob for an output directory strictly inside `root`
fn bundle_pattern(root: &Path, output: &Path) -> Option<String> {
    let root = std::path::absolute(root).ok()?;
    let output = std::path::absolute(output).ok()?;
    let relative = output.strip_prefix(&root).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    let relative = relative.to_string_lossy().replace('\\', "/");
    Some(format!("{}/**", relative.trim_end_matches('/')))
}

fn report(cli: &Cli, dir: &Path, output: &PipelineOutput, written: &[PathBuf]) -> Result<()> {
    if cli.json {
        let summary = RunSummary {
            output: dir,
            files_discovered: output.files_discovered,
            files_analyzed: output.files_analyzed,
            documents: output
                .bundle
                .documents()
                .map(|document| document.file_name())
                .collect(),
            diagnostics: &output.diagnostics,
        };
        return print_stdout(&serialize_json(&summary)?);
    }

    for diagnostic in &output.diagnostics {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Info => log::info!("{diagnostic}"),
        }
    }
    log::info!(
        "Wrote {} documents to {} ({} of {} files analyzed)",
        written.len(),
        dir.display(),
        output.files_analyzed,
        output.files_discovered
    );
    Ok(())
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}
