use serde::{Deserialize, Serialize};

/// How a commit touched a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    /// Workspace-relative, forward-slash path.
    pub path: String,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// One incoming commit, as delivered by the version-control adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub short_id: String,
    pub full_id: String,
    pub message: String,
    pub author: String,
    pub timestamp: String,
    pub changed_files: Vec<FileChange>,
}

impl CommitInfo {
    pub fn new(
        full_id: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        timestamp: impl Into<String>,
        changed_files: Vec<FileChange>,
    ) -> Self {
        let full_id = full_id.into();
        Self {
            short_id: full_id.chars().take(8).collect(),
            full_id,
            message: message.into(),
            author: author.into(),
            timestamp: timestamp.into(),
            changed_files,
        }
    }
}
