use crate::documents::{self, EndpointLinking};
use crate::error::Result;
use crate::limits::{Bounded, SizeLimits, TruncationStrategy};
use crate::overview::Overview;
use chrono::NaiveDate;
use context_protocol::{
    part_marker, part_name, ContextBundle, ContextDocument, Diagnostic, DiagnosticKind,
    DocumentFormat, DocumentPart, FileAnalysisRecord, FrameworkSignal, ProjectManifestInfo,
    VersionControlMetadata, PRIMARY_DOCUMENT,
};
use std::collections::BTreeMap;

pub const DEFAULT_MAX_FILES: usize = 500;
pub const DEFAULT_MAX_CHARS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Records kept, in discovery order
    pub max_files: usize,
    pub limits: SizeLimits,
    /// Embed endpoint rows in the structure document instead of referencing them
    pub inline_endpoints: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            limits: SizeLimits {
                max_lines: None,
                max_chars: Some(DEFAULT_MAX_CHARS),
                strategy: TruncationStrategy::Truncate,
            },
            inline_endpoints: false,
        }
    }
}

/// Everything one bundle is assembled from
#[derive(Debug, Clone)]
pub struct AssemblyInput {
    pub records: Vec<FileAnalysisRecord>,
    /// Files discovery produced, including those that failed analysis
    pub files_discovered: usize,
    pub manifest: ProjectManifestInfo,
    pub frameworks: Vec<FrameworkSignal>,
    pub vcs: Option<VersionControlMetadata>,
    pub generated_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct AssembledContext {
    pub bundle: ContextBundle,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds the bounded, cross-referenced document bundle
pub struct ContextAssembler {
    options: AssemblyOptions,
}

impl ContextAssembler {
    pub fn new(options: AssemblyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    pub fn assemble(&self, input: AssemblyInput) -> Result<AssembledContext> {
        let AssemblyInput {
            mut records,
            files_discovered,
            manifest,
            frameworks,
            vcs,
            generated_on,
        } = input;
        let mut diagnostics = Vec::new();

        // The bound counts discovered files; failed analyses still occupy slots
        let discovered = files_discovered.max(records.len());
        let excluded_files = discovered.saturating_sub(self.options.max_files);
        if excluded_files > 0 {
            records.truncate(self.options.max_files);
            log::warn!(
                "File limit {} reached, excluding {excluded_files} files",
                self.options.max_files
            );
            diagnostics.push(Diagnostic::files_excluded(records.len(), excluded_files));
        }

        let endpoints = documents::endpoints_document(&records)?;
        let linking = match (&endpoints, self.options.inline_endpoints) {
            (None, _) => EndpointLinking::Omitted,
            (Some(_), true) => EndpointLinking::Inline,
            (Some(_), false) => EndpointLinking::Reference,
        };

        let unbounded = [
            Some(documents::files_document(&records)),
            Some(documents::structure_document(&records, linking)?),
            endpoints,
            Some(documents::dependencies_document(&manifest)?),
            documents::framework_document(&frameworks),
            documents::git_diff_document(vcs.as_ref()),
        ];

        let mut secondary = BTreeMap::new();
        let mut links: Vec<(String, Vec<String>)> = Vec::new();
        for document in unbounded.into_iter().flatten() {
            let name = document.name.clone();
            let parts = self.bound(document, &mut diagnostics);
            let files = parts.iter().map(ContextDocument::file_name).collect();
            links.push((name.clone(), files));
            secondary.insert(name, parts);
        }

        let overview = Overview {
            manifest: &manifest,
            frameworks: &frameworks,
            records: &records,
            excluded_files,
            vcs: vcs.as_ref(),
            generated_on,
            links: &links,
        };
        let primary = ContextDocument::new(
            PRIMARY_DOCUMENT,
            DocumentFormat::Markdown,
            overview.render(),
        );
        let primary = self.bound(primary, &mut diagnostics);

        log::info!(
            "Assembled {} documents from {} files",
            primary.len() + secondary.values().map(Vec::len).sum::<usize>(),
            records.len()
        );

        Ok(AssembledContext {
            bundle: ContextBundle { primary, secondary },
            diagnostics,
        })
    }

    /// Apply the size limits to one document, yielding its parts
    fn bound(
        &self,
        document: ContextDocument,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ContextDocument> {
        let ContextDocument {
            name,
            format,
            content,
            ..
        } = document;

        match self.options.limits.apply(content) {
            Bounded::Unchanged(content) => vec![ContextDocument::new(name, format, content)],
            Bounded::Truncated { content, limit } => {
                log::debug!("Truncated {name} at {limit}");
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::DocumentTruncated {
                        document: name.clone(),
                        limit,
                    },
                    format!("{name} truncated at limit {limit}"),
                ));
                vec![ContextDocument::new(name, format, content)]
            }
            Bounded::Split(bodies) => {
                let total = bodies.len();
                log::debug!("Split {name} into {total} parts");
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::DocumentSplit {
                        document: name.clone(),
                        parts: total,
                    },
                    format!("{name} split into {total} parts"),
                ));
                bodies
                    .into_iter()
                    .enumerate()
                    .map(|(offset, body)| {
                        let index = offset + 1;
                        let mut part = ContextDocument::new(
                            part_name(&name, index),
                            format,
                            body + &part_marker(index, total),
                        );
                        part.part = Some(DocumentPart { index, total });
                        part
                    })
                    .collect()
            }
        }
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(AssemblyOptions::default())
    }
}
