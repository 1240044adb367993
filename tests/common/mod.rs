#![allow(dead_code)]

use buildscope::error::Result;
use buildscope::model::{ChangeKind, CommitInfo, FileChange};
use buildscope::vcs::CommitProvider;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

/// On-disk workspace built from `(relative path, content)` pairs.
pub struct WorkspaceFixture {
    _dir: TempDir,
    root: PathBuf,
}

impl WorkspaceFixture {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        // Canonicalize up front; the analyzer keys its cache by this form
        let root = dir.path().canonicalize().unwrap();
        let fixture = Self { _dir: dir, root };
        for (rel, content) in files {
            fixture.write(rel, content);
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Bumps a file's mtime well past any previous value.
    pub fn touch(&self, rel: &str) {
        let path = self.root.join(rel);
        let content = std::fs::read_to_string(&path).unwrap();
        let future = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
        std::fs::write(&path, content).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(future).unwrap();
    }
}

/// Fixed commit list standing in for a real version-control adapter.
pub struct StaticCommits {
    pub commits: Vec<CommitInfo>,
    pub tracked_files: usize,
}

impl StaticCommits {
    pub fn new(commits: Vec<CommitInfo>) -> Self {
        Self {
            commits,
            tracked_files: 0,
        }
    }

    pub fn with_tracked_files(commits: Vec<CommitInfo>, tracked_files: usize) -> Self {
        Self {
            commits,
            tracked_files,
        }
    }
}

impl CommitProvider for StaticCommits {
    fn incoming_commits(&self) -> Result<Vec<CommitInfo>> {
        Ok(self.commits.clone())
    }

    fn tracked_file_count(&self) -> Result<usize> {
        Ok(self.tracked_files)
    }
}

/// Commit with `changed` paths all marked as modified. The id is padded to a
/// realistic 40 characters.
pub fn commit(id: &str, message: &str, changed: &[&str]) -> CommitInfo {
    let full_id = format!("{id:0<40}");
    CommitInfo::new(
        full_id,
        message,
        "dev@example.com",
        "2024-05-01T10:00:00+00:00",
        changed
            .iter()
            .map(|path| FileChange::new(*path, ChangeKind::Modified))
            .collect(),
    )
}

/// The analyzer enforces one analysis per process; tests that drive it take
/// this lock so parallel test threads queue instead of erroring. Also points
/// the cache store at a throwaway directory the first time through.
pub fn analysis_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    static CACHE_DIR: OnceLock<TempDir> = OnceLock::new();
    let guard = LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let cache_dir = CACHE_DIR.get_or_init(|| TempDir::new().unwrap());
    std::env::set_var("BUILDSCOPE_CACHE_DIR", cache_dir.path());
    guard
}
