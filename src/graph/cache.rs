//! Persisted graph snapshot.
//!
//! One JSON blob per workspace, keyed by the xxh3 hash of the canonical root
//! path and stored under `~/.buildscope/caches` (override with
//! `BUILDSCOPE_CACHE_DIR`). The blob records each file's mtime and resolved
//! includes; reverse-dependency edges and the filename index are rebuilt from
//! it on warm start.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use xxhash_rust::xxh3::xxh3_64;

pub const DEFAULT_CACHE_DIR: &str = ".buildscope/caches";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedFile {
    /// Modification time in milliseconds since the epoch.
    pub mtime: u64,
    /// Workspace-relative resolved include targets, in file order.
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphCache {
    /// Canonical workspace root the snapshot was built from.
    pub root_path: String,
    /// ISO-8601 build timestamp.
    pub built_at: String,
    pub files: HashMap<String, CachedFile>,
}

/// Loads and stores one workspace's cache blob.
pub struct CacheStore {
    cache_path: PathBuf,
}

impl CacheStore {
    /// `root` should already be canonicalized; the cache key is derived from
    /// its textual form.
    pub fn new(root: &Path) -> Self {
        let hash = xxh3_64(root.to_string_lossy().as_bytes());
        Self {
            cache_path: Self::base_dir().join(format!("{:016x}.json", hash)),
        }
    }

    pub fn base_dir() -> PathBuf {
        if let Ok(env_dir) = std::env::var("BUILDSCOPE_CACHE_DIR") {
            return PathBuf::from(env_dir);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Path::new(&home).join(DEFAULT_CACHE_DIR)
    }

    /// Returns the cached snapshot, or `None` when absent or unreadable.
    /// Corruption is not fatal; the caller falls back to a cold build.
    pub fn load(&self) -> Option<GraphCache> {
        if !self.cache_path.exists() {
            return None;
        }
        let text = std::fs::read_to_string(&self.cache_path).ok()?;
        match serde_json::from_str(&text) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(
                    "discarding corrupt cache {}: {}",
                    self.cache_path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn save(&self, cache: &GraphCache) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string(cache)?;
        std::fs::write(&self.cache_path, text)?;
        Ok(())
    }

    /// Removes this workspace's snapshot.
    pub fn clear(&self) -> Result<()> {
        if self.cache_path.exists() {
            std::fs::remove_file(&self.cache_path)?;
        }
        Ok(())
    }

    /// Removes every cached snapshot.
    pub fn clear_all() -> Result<()> {
        let base = Self::base_dir();
        if base.exists() {
            std::fs::remove_dir_all(&base)?;
        }
        Ok(())
    }
}
