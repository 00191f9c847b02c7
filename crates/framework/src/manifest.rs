use crate::error::{ManifestError, Result};
use context_protocol::{PackageManager, ProjectManifestInfo};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "package.json";

/// Lockfiles in detection order
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("package-lock.json", PackageManager::Npm),
];

/// Conventional entry modules checked when present
const CONVENTIONAL_ENTRIES: &[&str] = &["src/index", "src/main", "server", "app"];
const ENTRY_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
    package_manager: Option<String>,
    main: Option<String>,
    module: Option<String>,
    bin: Option<BinField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BinField {
    Single(String),
    Named(BTreeMap<String, String>),
}

/// Read `package.json` under `root`
pub fn load_manifest(root: &Path) -> Result<ProjectManifestInfo> {
    let path = root.join(MANIFEST_FILE);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ManifestError::NotFound(root.to_path_buf()));
        }
        Err(source) => return Err(ManifestError::Io { path, source }),
    };
    let package: PackageJson =
        serde_json::from_str(&raw).map_err(|source| ManifestError::Malformed { path, source })?;

    let name = package
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| directory_name(root));
    let package_manager = package
        .package_manager
        .as_deref()
        .and_then(PackageManager::parse)
        .unwrap_or_else(|| detect_from_lockfiles(root));
    let entry_points = entry_points(root, &package);

    log::debug!(
        "Loaded manifest {name}: {} dependencies, {} dev dependencies",
        package.dependencies.len(),
        package.dev_dependencies.len()
    );

    Ok(ProjectManifestInfo {
        name,
        version: package.version,
        description: package.description,
        dependencies: package.dependencies,
        dev_dependencies: package.dev_dependencies,
        scripts: package.scripts,
        package_manager,
        entry_points,
    })
}

/// Project name used when no manifest names one
pub fn directory_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

fn detect_from_lockfiles(root: &Path) -> PackageManager {
    LOCKFILES
        .iter()
        .find(|(file, _)| root.join(file).is_file())
        .map(|(_, manager)| *manager)
        .unwrap_or_default()
}

fn entry_points(root: &Path, package: &PackageJson) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    let mut push = |entry: &str| {
        let entry = entry.trim_start_matches("./").to_string();
        if !entry.is_empty() && !entries.contains(&entry) {
            entries.push(entry);
        }
    };

    for declared in [&package.main, &package.module].into_iter().flatten() {
        push(declared.as_str());
    }
    match &package.bin {
        Some(BinField::Single(path)) => push(path.as_str()),
        Some(BinField::Named(bins)) => bins.values().for_each(|path| push(path.as_str())),
        None => {}
    }

    for stem in CONVENTIONAL_ENTRIES {
        for ext in ENTRY_EXTENSIONS {
            let candidate = format!("{stem}.{ext}");
            if root.join(&candidate).is_file() {
                push(candidate.as_str());
            }
        }
    }

    entries
}
