//! Git adapter shelling out to the `git` binary.

use super::CommitProvider;
use crate::error::{BuildscopeError, Result};
use crate::model::{ChangeKind, CommitInfo, FileChange};
use crate::paths;
use std::path::PathBuf;
use std::process::Command;

/// Field separator in `git log` format strings; never appears in commit
/// metadata.
const UNIT_SEP: char = '\x1f';

pub struct GitCli {
    workspace: PathBuf,
}

impl GitCli {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.workspace)
            .args(args)
            .output()
            .map_err(|e| BuildscopeError::Vcs(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildscopeError::Vcs(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn changed_files(&self, commit_id: &str) -> Result<Vec<FileChange>> {
        let output = self.run(&[
            "diff-tree",
            "--no-commit-id",
            "--name-status",
            "-r",
            "-M",
            commit_id,
        ])?;

        let mut changes = Vec::new();
        for line in output.lines() {
            let mut fields = line.split('\t');
            let Some(status) = fields.next() else { continue };
            let kind = match status.chars().next() {
                Some('A') => ChangeKind::Added,
                Some('D') => ChangeKind::Deleted,
                Some('R') => ChangeKind::Renamed,
                Some('M') | Some('T') => ChangeKind::Modified,
                _ => continue,
            };
            // Renames carry "old<TAB>new"; the new path is the one that exists
            let path = match kind {
                ChangeKind::Renamed => fields.nth(1),
                _ => fields.next(),
            };
            if let Some(path) = path {
                changes.push(FileChange::new(paths::normalize_separators(path), kind));
            }
        }
        Ok(changes)
    }
}

impl CommitProvider for GitCli {
    fn incoming_commits(&self) -> Result<Vec<CommitInfo>> {
        let format = format!("%H{UNIT_SEP}%an{UNIT_SEP}%aI{UNIT_SEP}%s");
        let log = self.run(&[
            "log",
            "--reverse",
            &format!("--format={format}"),
            "HEAD..@{upstream}",
        ])?;

        let mut commits = Vec::new();
        for line in log.lines() {
            let fields: Vec<&str> = line.split(UNIT_SEP).collect();
            let &[id, author, timestamp, message] = fields.as_slice() else {
                continue;
            };
            let changed_files = self.changed_files(id)?;
            commits.push(CommitInfo::new(id, message, author, timestamp, changed_files));
        }
        Ok(commits)
    }

    fn tracked_file_count(&self) -> Result<usize> {
        let output = self.run(&["ls-files"])?;
        Ok(output.lines().filter(|l| !l.is_empty()).count())
    }
}
