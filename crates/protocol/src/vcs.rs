use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDescriptor {
    pub hash: String,
    pub short_hash: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Committer date, ISO 8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingTreeState {
    Clean,
    Dirty,
}

/// Repository state at generation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionControlMetadata {
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<CommitDescriptor>,
    pub state: WorkingTreeState,
    #[serde(default)]
    pub changed_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_stat: Option<String>,
}

impl VersionControlMetadata {
    pub fn is_dirty(&self) -> bool {
        self.state == WorkingTreeState::Dirty
    }

    /// Diff stat text when there is any
    pub fn diff_content(&self) -> Option<&str> {
        self.diff_stat
            .as_deref()
            .map(str::trim_end)
            .filter(|stat| !stat.trim().is_empty())
    }
}
