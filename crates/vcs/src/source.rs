use async_trait::async_trait;
use context_protocol::VersionControlMetadata;

/// Supplier of repository state. `None` means no metadata is available, which
/// is never an error for callers.
#[async_trait]
pub trait VersionControlSource: Send + Sync {
    async fn collect(&self) -> Option<VersionControlMetadata>;
}

/// Source for runs with version-control metadata disabled
pub struct NoVersionControl;

#[async_trait]
impl VersionControlSource for NoVersionControl {
    async fn collect(&self) -> Option<VersionControlMetadata> {
        None
    }
}
