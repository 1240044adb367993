//! Workspace directory traversal.
//!
//! The walk is an explicit queue-based BFS rather than recursion: source
//! trees can nest deeper than any reasonable stack, and symlinks can form
//! directory cycles. Every dequeued directory is canonicalized and checked
//! against a visited set before its entries are read, so a cycle is entered
//! at most once, and a hard cap bounds pathological trees.

use crate::paths;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Directory basenames that are never descended into.
pub const DIR_SKIP_LIST: &[&str] = &[
    ".git",
    "node_modules",
    "build",
    "out",
    "dist",
    ".vs",
    ".vscode",
    "__pycache__",
    "Debug",
    "Release",
    "x64",
    "x86",
    ".idea",
    "cmake-build-debug",
    "cmake-build-release",
    "Binaries",
    "Intermediate",
    "DerivedDataCache",
    "Saved",
];

/// Traversal aborts once this many distinct canonical directories were seen.
const MAX_VISITED_DIRS: usize = 500_000;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Non-empty limits the walk to these workspace-relative roots.
    pub include_paths: Vec<String>,
    /// Workspace-relative prefixes skipped in addition to `DIR_SKIP_LIST`.
    pub exclude_paths: Vec<String>,
}

/// A discovered C/C++ source or header file.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub mtime_ms: u64,
}

pub struct WorkspaceScanner<'a> {
    root: &'a Path,
    options: &'a ScanOptions,
}

impl<'a> WorkspaceScanner<'a> {
    pub fn new(root: &'a Path, options: &'a ScanOptions) -> Self {
        Self { root, options }
    }

    /// Collects every C/C++ source and header file under the scan roots.
    pub fn scan_sources(&self) -> Vec<ScannedFile> {
        let mut files = Vec::new();
        self.walk(|abs, rel, metadata| {
            if paths::is_tracked_path(rel) {
                files.push(ScannedFile {
                    rel_path: rel.to_string(),
                    abs_path: abs.to_path_buf(),
                    mtime_ms: mtime_ms(metadata),
                });
            }
        });
        files
    }

    /// Collects workspace-relative paths of files whose basename satisfies
    /// `matches`. Used by module detection to locate build manifests.
    pub fn find_files(&self, matches: impl Fn(&str) -> bool) -> Vec<String> {
        let mut found = Vec::new();
        self.walk(|_abs, rel, _metadata| {
            if matches(paths::basename_of(rel)) {
                found.push(rel.to_string());
            }
        });
        found
    }

    fn walk(&self, mut on_file: impl FnMut(&Path, &str, &fs::Metadata)) {
        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        if self.options.include_paths.is_empty() {
            queue.push_back(self.root.to_path_buf());
        } else {
            for rel in &self.options.include_paths {
                let abs = self.root.join(paths::normalize_separators(rel));
                if abs.is_dir() {
                    queue.push_back(abs);
                } else {
                    debug!("include path {} is not a directory, skipping", rel);
                }
            }
        }

        let excludes: Vec<String> = self
            .options
            .exclude_paths
            .iter()
            .map(|p| paths::normalize_separators(p))
            .collect();

        let mut visited: HashSet<PathBuf> = HashSet::new();

        while let Some(dir) = queue.pop_front() {
            // Canonicalization resolves symlinks, so a link cycle maps onto
            // an already-visited directory and the re-entry is dropped.
            let canonical = match fs::canonicalize(&dir) {
                Ok(c) => c,
                Err(e) => {
                    debug!("cannot canonicalize {}: {}", dir.display(), e);
                    continue;
                }
            };
            if !visited.insert(canonical) {
                continue;
            }
            if visited.len() >= MAX_VISITED_DIRS {
                warn!(
                    "directory traversal aborted after {} directories",
                    MAX_VISITED_DIRS
                );
                break;
            }

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("cannot read {}: {}", dir.display(), e);
                    continue;
                }
            };

            for entry in entries {
                let Ok(entry) = entry else { continue };
                let path = entry.path();
                // metadata() follows symlinks so linked directories are
                // traversed (and caught by the visited set).
                let Ok(metadata) = fs::metadata(&path) else {
                    continue;
                };

                let Some(rel) = paths::workspace_relative(&path, self.root) else {
                    continue;
                };

                if metadata.is_dir() {
                    let name = paths::basename_of(&rel);
                    if name.starts_with('.') || DIR_SKIP_LIST.contains(&name) {
                        continue;
                    }
                    if is_excluded(&rel, &excludes) {
                        continue;
                    }
                    queue.push_back(path);
                } else if metadata.is_file() {
                    on_file(&path, &rel, &metadata);
                }
            }
        }
    }
}

fn is_excluded(rel: &str, excludes: &[String]) -> bool {
    excludes
        .iter()
        .any(|ex| rel == ex || rel.starts_with(&format!("{ex}/")))
}

fn mtime_ms(metadata: &fs::Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|m| m.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
