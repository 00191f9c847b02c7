//! Builders for the secondary documents of a bundle.

use crate::error::{AssemblyError, Result};
use context_protocol::{
    ClassifiedElement, ContextDocument, DetectionSource, DocumentFormat, DocumentReference,
    FileAnalysisRecord, FileCategory, FrameworkSignal, PackageManager, ProjectManifestInfo,
    VersionControlMetadata, DEPENDENCIES_DOCUMENT, ENDPOINTS_DOCUMENT, FILES_DOCUMENT,
    FRAMEWORK_DOCUMENT, GIT_DIFF_DOCUMENT, STRUCTURE_DOCUMENT,
};
use serde::Serialize;
use std::collections::BTreeMap;

fn to_json<T: Serialize>(document: &'static str, value: &T) -> Result<String> {
    context_protocol::serialize_json(value)
        .map_err(|source| AssemblyError::Serialize { document, source })
}

pub(crate) fn files_document(records: &[FileAnalysisRecord]) -> ContextDocument {
    let mut content = String::new();
    for record in records {
        content.push_str(&record.path);
        content.push('\n');
    }
    ContextDocument::new(FILES_DOCUMENT, DocumentFormat::PlainText, content)
}

#[derive(Serialize)]
struct ServiceSummary<'a> {
    name: &'a str,
    methods: &'a [String],
}

#[derive(Serialize)]
struct ModelSummary<'a> {
    name: &'a str,
    fields: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EndpointRow<'a> {
    method: &'a str,
    path: &'a str,
    handler: &'a str,
    file: &'a str,
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    framework: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EndpointField<'a> {
    Reference(DocumentReference),
    Inline(Vec<EndpointRow<'a>>),
}

#[derive(Serialize)]
struct StructureEntry<'a> {
    path: &'a str,
    category: FileCategory,
    imports: &'a [String],
    exports: &'a [String],
    functions: &'a [String],
    classes: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    components: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    services: Vec<ServiceSummary<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    models: Vec<ModelSummary<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    middleware: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hooks: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    config: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoints: Option<EndpointField<'a>>,
}

/// How a structure entry presents its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EndpointLinking {
    /// No endpoints document exists
    Omitted,
    /// `DocumentReference` into the endpoints document
    Reference,
    Inline,
}

pub(crate) fn structure_document(
    records: &[FileAnalysisRecord],
    linking: EndpointLinking,
) -> Result<ContextDocument> {
    let entries: Vec<StructureEntry<'_>> = records
        .iter()
        .map(|record| structure_entry(record, linking))
        .collect();
    Ok(ContextDocument::new(
        STRUCTURE_DOCUMENT,
        DocumentFormat::Json,
        to_json(STRUCTURE_DOCUMENT, &entries)?,
    ))
}

fn structure_entry(record: &FileAnalysisRecord, linking: EndpointLinking) -> StructureEntry<'_> {
    let mut entry = StructureEntry {
        path: &record.path,
        category: record.category,
        imports: &record.imports,
        exports: &record.exports,
        functions: &record.functions,
        classes: &record.classes,
        components: Vec::new(),
        services: Vec::new(),
        models: Vec::new(),
        middleware: Vec::new(),
        hooks: Vec::new(),
        config: Vec::new(),
        endpoints: None,
    };

    for element in &record.elements {
        match element {
            ClassifiedElement::Component(c) => entry.components.push(&c.name),
            ClassifiedElement::Service(s) => entry.services.push(ServiceSummary {
                name: &s.name,
                methods: &s.methods,
            }),
            ClassifiedElement::Model(m) => entry.models.push(ModelSummary {
                name: &m.name,
                fields: &m.fields,
            }),
            ClassifiedElement::Middleware(m) => entry.middleware.push(&m.name),
            ClassifiedElement::Utility(u) => entry.hooks.push(&u.name),
            ClassifiedElement::ConfigObject(c) => entry.config.push(&c.name),
            ClassifiedElement::Endpoint(_) => {}
        }
    }

    let count = record.endpoint_count();
    if count > 0 {
        entry.endpoints = match linking {
            EndpointLinking::Omitted => None,
            EndpointLinking::Reference => Some(EndpointField::Reference(DocumentReference::new(
                ENDPOINTS_DOCUMENT,
                record.path.clone(),
                count,
            ))),
            EndpointLinking::Inline => Some(EndpointField::Inline(endpoint_rows(record))),
        };
    }
    entry
}

fn endpoint_rows(record: &FileAnalysisRecord) -> Vec<EndpointRow<'_>> {
    record
        .endpoints()
        .map(|endpoint| EndpointRow {
            method: &endpoint.method,
            path: &endpoint.path,
            handler: &endpoint.handler,
            file: &endpoint.file,
            line: endpoint.line,
            framework: endpoint.framework.as_deref(),
        })
        .collect()
}

/// `None` when no record has an endpoint
pub(crate) fn endpoints_document(records: &[FileAnalysisRecord]) -> Result<Option<ContextDocument>> {
    let rows: Vec<EndpointRow<'_>> = records.iter().flat_map(endpoint_rows).collect();
    if rows.is_empty() {
        return Ok(None);
    }
    Ok(Some(ContextDocument::new(
        ENDPOINTS_DOCUMENT,
        DocumentFormat::Json,
        to_json(ENDPOINTS_DOCUMENT, &rows)?,
    )))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DependencySummary<'a> {
    package_manager: PackageManager,
    dependencies: &'a BTreeMap<String, String>,
    dev_dependencies: &'a BTreeMap<String, String>,
    scripts: &'a BTreeMap<String, String>,
}

pub(crate) fn dependencies_document(manifest: &ProjectManifestInfo) -> Result<ContextDocument> {
    let summary = DependencySummary {
        package_manager: manifest.package_manager,
        dependencies: &manifest.dependencies,
        dev_dependencies: &manifest.dev_dependencies,
        scripts: &manifest.scripts,
    };
    Ok(ContextDocument::new(
        DEPENDENCIES_DOCUMENT,
        DocumentFormat::Json,
        to_json(DEPENDENCIES_DOCUMENT, &summary)?,
    ))
}

/// `None` when no framework was identified
pub(crate) fn framework_document(frameworks: &[FrameworkSignal]) -> Option<ContextDocument> {
    if frameworks.is_empty() {
        return None;
    }

    let mut content = String::from("# Frameworks\n");
    for signal in frameworks {
        content.push_str(&format!("\n## {}\n\n", signal.name));
        if let Some(version) = &signal.version {
            content.push_str(&format!("- **Version**: {version}\n"));
        }
        let source = match signal.source {
            DetectionSource::Manifest => "declared dependency",
            DetectionSource::EndpointVotes => "endpoint patterns",
        };
        content.push_str(&format!("- **Detected from**: {source}\n"));
        if signal.features.is_empty() {
            content.push_str("- **Features**: none detected\n");
        } else {
            content.push_str(&format!("- **Features**: {}\n", signal.features.join(", ")));
        }
    }
    Some(ContextDocument::new(
        FRAMEWORK_DOCUMENT,
        DocumentFormat::Markdown,
        content,
    ))
}

/// `None` without metadata or with an empty diff stat
pub(crate) fn git_diff_document(vcs: Option<&VersionControlMetadata>) -> Option<ContextDocument> {
    let diff = vcs?.diff_content()?;
    Some(ContextDocument::new(
        GIT_DIFF_DOCUMENT,
        DocumentFormat::PlainText,
        format!("{diff}\n"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_protocol::{Endpoint, Service};
    use pretty_assertions::assert_eq;

    fn record(path: &str, elements: Vec<ClassifiedElement>) -> FileAnalysisRecord {
        FileAnalysisRecord {
            path: path.to_string(),
            category: FileCategory::Utility,
            imports: vec![],
            exports: vec![],
            functions: vec![],
            classes: vec![],
            elements,
        }
    }

    fn get_users() -> ClassifiedElement {
        ClassifiedElement::Endpoint(Endpoint::new(
            "src/app.js",
            4,
            "GET",
            "/users",
            "listUsers",
            Some("express"),
        ))
    }

    #[test]
    fn structure_references_endpoint_rows_by_path() {
        let records = vec![record("src/app.js", vec![get_users()])];
        let doc = structure_document(&records, EndpointLinking::Reference).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(
            value[0]["endpoints"],
            serde_json::json!({"target": "endpoints", "filter": "src/app.js", "count": 1})
        );
        assert!(value[0].get("services").is_none());
    }

    #[test]
    fn structure_inlines_endpoints_when_asked() {
        let records = vec![record("src/app.js", vec![get_users()])];
        let doc = structure_document(&records, EndpointLinking::Inline).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(value[0]["endpoints"][0]["handler"], "listUsers");
        assert_eq!(value[0]["endpoints"][0]["framework"], "express");
    }

    #[test]
    fn services_keep_their_methods() {
        let service = ClassifiedElement::Service(Service {
            name: "UserService".into(),
            file: "src/user.service.ts".into(),
            line: 1,
            methods: vec!["findAll".into(), "create".into()],
            injectable: false,
        });
        let records = vec![record("src/user.service.ts", vec![service])];
        let doc = structure_document(&records, EndpointLinking::Omitted).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(
            value[0]["services"],
            serde_json::json!([{"name": "UserService", "methods": ["findAll", "create"]}])
        );
        assert!(value[0].get("endpoints").is_none());
    }

    #[test]
    fn endpoints_document_lists_rows_and_is_omitted_when_empty() {
        assert!(endpoints_document(&[record("a.ts", vec![])]).unwrap().is_none());

        let doc = endpoints_document(&[record("src/app.js", vec![get_users()])])
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "method": "GET",
                "path": "/users",
                "handler": "listUsers",
                "file": "src/app.js",
                "line": 4,
                "framework": "express"
            }])
        );
    }

    #[test]
    fn dependencies_use_manifest_field_names() {
        let mut manifest = ProjectManifestInfo::unnamed("demo");
        manifest.scripts.insert("dev".into(), "vite".into());
        let doc = dependencies_document(&manifest).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(value["packageManager"], "npm");
        assert_eq!(value["scripts"]["dev"], "vite");
        assert_eq!(value["devDependencies"], serde_json::json!({}));
    }
}
