use crate::catalog::{FrameworkDescriptor, CATALOG};
use context_protocol::{DetectionSource, Endpoint, FrameworkSignal, ProjectManifestInfo};
use std::collections::BTreeMap;

/// Framework identification from manifest dependencies, falling back to a
/// vote over endpoint framework tags.
pub struct FrameworkInferer {
    catalog: &'static [FrameworkDescriptor],
}

impl Default for FrameworkInferer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkInferer {
    pub fn new() -> Self {
        Self { catalog: CATALOG }
    }

    pub fn with_catalog(catalog: &'static [FrameworkDescriptor]) -> Self {
        Self { catalog }
    }

    pub fn infer<'a>(
        &self,
        manifest: Option<&ProjectManifestInfo>,
        endpoints: impl IntoIterator<Item = &'a Endpoint>,
    ) -> Vec<FrameworkSignal> {
        let from_manifest = manifest
            .map(|manifest| self.from_manifest(manifest))
            .unwrap_or_default();
        if !from_manifest.is_empty() {
            return from_manifest;
        }

        let voted = self.from_endpoint_votes(endpoints);
        if voted.is_empty() {
            log::info!("No framework identified");
        }
        voted
    }

    /// Every catalog entry with a matching dependency, in catalog order
    pub fn from_manifest(&self, manifest: &ProjectManifestInfo) -> Vec<FrameworkSignal> {
        self.catalog
            .iter()
            .filter_map(|descriptor| {
                let version = descriptor
                    .packages
                    .iter()
                    .find_map(|package| manifest.dependency_version(package))?;

                let mut features: Vec<String> = Vec::new();
                for (package, feature) in descriptor.companions {
                    if manifest.has_dependency(package)
                        && !features.iter().any(|known| known == feature)
                    {
                        features.push(feature.to_string());
                    }
                }

                log::debug!(
                    "Framework {} {version} from manifest, features {features:?}",
                    descriptor.display_name
                );
                Some(FrameworkSignal {
                    name: descriptor.display_name.to_string(),
                    version: Some(version.to_string()),
                    features,
                    source: DetectionSource::Manifest,
                })
            })
            .collect()
    }

    /// Single most frequent endpoint tag; equal counts go to the tag that
    /// sorts first.
    pub fn from_endpoint_votes<'a>(
        &self,
        endpoints: impl IntoIterator<Item = &'a Endpoint>,
    ) -> Vec<FrameworkSignal> {
        let mut votes: BTreeMap<&str, usize> = BTreeMap::new();
        for endpoint in endpoints {
            if let Some(tag) = endpoint.framework.as_deref() {
                *votes.entry(tag).or_default() += 1;
            }
        }

        let mut winner: Option<(&str, usize)> = None;
        for (tag, count) in votes {
            if winner.map_or(true, |(_, best)| count > best) {
                winner = Some((tag, count));
            }
        }
        let Some((tag, count)) = winner else {
            return Vec::new();
        };

        let name = self
            .catalog
            .iter()
            .find(|descriptor| descriptor.tag == tag)
            .map_or_else(|| tag.to_string(), |d| d.display_name.to_string());
        log::debug!("Framework {name} from {count} endpoint votes");

        vec![FrameworkSignal {
            name,
            version: None,
            features: Vec::new(),
            source: DetectionSource::EndpointVotes,
        }]
    }
}
