use serde::{Deserialize, Serialize};

/// How a framework was identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Matched a dependency name in the manifest
    Manifest,
    /// Won the vote over endpoint framework tags
    EndpointVotes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSignal {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub source: DetectionSource,
}
