use anyhow::{Context as AnyhowContext, Result};
use context_protocol::{ContextBundle, PRIMARY_DOCUMENT, SECONDARY_DOCUMENTS};
use std::fs;
use std::path::{Path, PathBuf};

/// Write every document part into `dir`, replacing documents of earlier runs
pub fn write_bundle(bundle: &ContextBundle, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    remove_stale_documents(dir)?;

    let mut written = Vec::new();
    for document in bundle.documents() {
        let path = dir.join(document.file_name());
        fs::write(&path, &document.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn remove_stale_documents(dir: &Path) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_bundle_document(&path) {
            continue;
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove stale {}", path.display()))?;
    }
    Ok(())
}

/// `name.ext` or `name_partN.ext` for a known document name
fn is_bundle_document(path: &Path) -> bool {
    let (Some(stem), Some(ext)) = (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|s| s.to_str()),
    ) else {
        return false;
    };
    if !matches!(ext, "md" | "txt" | "json") {
        return false;
    }
    std::iter::once(PRIMARY_DOCUMENT)
        .chain(SECONDARY_DOCUMENTS.iter().copied())
        .any(|name| {
            stem == name
                || stem
                    .strip_prefix(name)
                    .and_then(|rest| rest.strip_prefix("_part"))
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_protocol::{ContextDocument, DocumentFormat};
    use std::collections::BTreeMap;

    #[test]
    fn recognises_documents_and_parts_only() {
        assert!(is_bundle_document(Path::new("context.md")));
        assert!(is_bundle_document(Path::new("structure_part12.json")));
        assert!(!is_bundle_document(Path::new("structure_partx.json")));
        assert!(!is_bundle_document(Path::new("notes.md")));
        assert!(!is_bundle_document(Path::new("files.csv")));
    }

    #[test]
    fn rewrite_drops_parts_of_previous_runs() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("files_part3.txt"), "old").unwrap();
        fs::write(temp.path().join("keep.txt"), "mine").unwrap();

        let bundle = ContextBundle {
            primary: vec![ContextDocument::new(
                PRIMARY_DOCUMENT,
                DocumentFormat::Markdown,
                "# Project context: demo\n",
            )],
            secondary: BTreeMap::new(),
        };
        let written = write_bundle(&bundle, temp.path()).unwrap();

        assert_eq!(written, vec![temp.path().join("context.md")]);
        assert!(!temp.path().join("files_part3.txt").exists());
        assert!(temp.path().join("keep.txt").exists());
    }
}
