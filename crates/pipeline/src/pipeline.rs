use crate::config::PipelineConfig;
use crate::error::Result;
use chrono::NaiveDate;
use context_assembler::{AssemblyInput, ContextAssembler};
use context_classifier::SyntaxClassifier;
use context_discovery::{FileScanner, ScanMode};
use context_framework::{directory_name, load_manifest, FrameworkInferer};
use context_protocol::{
    ContextBundle, Diagnostic, DiagnosticKind, FileAnalysisRecord, ProjectManifestInfo,
    SourceFile,
};
use context_vcs::{GitMetadataCollector, VersionControlSource};
use std::sync::Arc;

/// Result of one run: the bundle plus every recoverable condition met on the way
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub bundle: ContextBundle,
    pub diagnostics: Vec<Diagnostic>,
    pub scan_mode: ScanMode,
    pub files_discovered: usize,
    pub files_analyzed: usize,
}

/// Discovery → classification → inference → assembly over one project root
pub struct ContextPipeline {
    config: PipelineConfig,
    vcs: Arc<dyn VersionControlSource>,
}

impl ContextPipeline {
    /// Validates the configuration; nothing touches the file system yet
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let vcs =
            Arc::new(GitMetadataCollector::new(&config.root).with_timeout(config.git_timeout()));
        Ok(Self { config, vcs })
    }

    /// Replace the git collector
    pub fn with_version_control(mut self, source: Arc<dyn VersionControlSource>) -> Self {
        self.vcs = source;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with today's local date as the generation date
    pub async fn run(&self) -> Result<PipelineOutput> {
        self.run_on(chrono::Local::now().date_naive()).await
    }

    pub async fn run_on(&self, generated_on: NaiveDate) -> Result<PipelineOutput> {
        let root = &self.config.root;
        log::info!("Building context bundle for {}", root.display());

        let outcome = FileScanner::new(root, self.config.scan_options())
            .scan()
            .await?;
        let mut diagnostics = outcome.diagnostics;
        let files_discovered = outcome.files.len();

        let records = self.classify(&outcome.files, &mut diagnostics).await;
        let files_analyzed = records.len();

        let manifest = match load_manifest(root) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                log::info!("Manifest unavailable: {e}");
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::ManifestUnavailable,
                    format!("manifest unavailable: {e}"),
                ));
                None
            }
        };

        let frameworks = FrameworkInferer::new().infer(
            manifest.as_ref(),
            records.iter().flat_map(|record| record.endpoints()),
        );

        let vcs = if self.config.include_git_metadata {
            let metadata = self.vcs.collect().await;
            if metadata.is_none() {
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::VersionControlUnavailable,
                    "version control metadata unavailable",
                ));
            }
            metadata
        } else {
            None
        };

        let manifest =
            manifest.unwrap_or_else(|| ProjectManifestInfo::unnamed(directory_name(root)));
        let assembled = ContextAssembler::new(self.config.assembly_options()).assemble(
            AssemblyInput {
                records,
                files_discovered,
                manifest,
                frameworks,
                vcs,
                generated_on,
            },
        )?;
        diagnostics.extend(assembled.diagnostics);

        log::info!(
            "Analyzed {files_analyzed} of {files_discovered} files, {} diagnostics",
            diagnostics.len()
        );

        Ok(PipelineOutput {
            bundle: assembled.bundle,
            diagnostics,
            scan_mode: outcome.mode,
            files_discovered,
            files_analyzed,
        })
    }

    /// Sequential per-file analysis; failing files are skipped with a diagnostic
    async fn classify(
        &self,
        files: &[SourceFile],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<FileAnalysisRecord> {
        let mut classifier = SyntaxClassifier::new();
        let mut records = Vec::with_capacity(files.len());

        for file in files {
            let path = self.config.root.join(&file.path);
            let source = match tokio::fs::read_to_string(&path).await {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("Failed to read {}: {e}", file.path);
                    diagnostics.push(Diagnostic::unreadable_entry(file.path.as_str(), &e));
                    continue;
                }
            };
            match classifier.classify(file, &source) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!("Failed to analyze {}: {e}", file.path);
                    diagnostics.push(Diagnostic::parse_failure(file.path.as_str(), &e));
                }
            }
        }
        records
    }
}
