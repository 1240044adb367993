//! Reverse-dependency graph over C/C++ source and header files.
//!
//! Nodes are discovered files; an edge runs from an including file to the
//! file it includes, so the reverse-dependents of a header are its incoming
//! neighbors. The graph is rebuilt incrementally: a warm start restores
//! nodes and edges from the persisted cache, and `build` re-parses only the
//! files whose mtime changed.

pub mod cache;
pub mod include;
pub mod scanner;

use crate::error::Result;
use crate::paths;
use cache::{CachedFile, GraphCache};
use include::IncludeParser;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rayon::prelude::*;
use scanner::{ScanOptions, ScannedFile, WorkspaceScanner};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct FileNode {
    pub path: String,
    pub mtime_ms: u64,
    /// Workspace-relative resolved include targets, in file order.
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IncludeEdge;

/// Counters from one `build` pass, mostly for logging and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStats {
    pub discovered: usize,
    pub parsed: usize,
    pub removed: usize,
}

pub struct DependencyGraph {
    root: PathBuf,
    topology: StableDiGraph<FileNode, IncludeEdge>,
    path_index: HashMap<String, NodeIndex>,
    /// Lowercased basename -> discovery-ordered paths, for fuzzy resolution.
    filename_index: HashMap<String, Vec<String>>,
    project_scope: Option<HashSet<String>>,
}

impl DependencyGraph {
    /// `root` should be canonical; relative paths are derived from it and the
    /// cache is keyed by its textual form.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            topology: StableDiGraph::new(),
            path_index: HashMap::new(),
            filename_index: HashMap::new(),
            project_scope: None,
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Scopes the denominator and `affected` results; scanning is not
    /// affected, a header outside the build can still dirty files inside it.
    pub fn set_project_scope(&mut self, scope: Option<HashSet<String>>) {
        self.project_scope = scope.filter(|s| !s.is_empty());
    }

    /// Scans the workspace and brings the graph up to date. Safe to call
    /// repeatedly; an unchanged tree re-parses nothing.
    pub fn build(&mut self, options: &ScanOptions) -> Result<BuildStats> {
        let scanner = WorkspaceScanner::new(&self.root, options);
        let discovered = scanner.scan_sources();
        let discovered_set: HashSet<String> =
            discovered.iter().map(|f| f.rel_path.clone()).collect();

        // Purge files that disappeared since the cache was written.
        let removed: Vec<String> = self
            .path_index
            .keys()
            .filter(|path| !discovered_set.contains(*path))
            .cloned()
            .collect();
        for path in &removed {
            if let Some(idx) = self.path_index.remove(path) {
                self.topology.remove_node(idx);
            }
        }

        self.rebuild_filename_index(&discovered);

        // New files and files whose mtime moved since the last parse.
        let to_parse: Vec<&ScannedFile> = discovered
            .iter()
            .filter(|f| {
                match self.path_index.get(&f.rel_path) {
                    Some(&idx) => self.topology[idx].mtime_ms != f.mtime_ms,
                    None => true,
                }
            })
            .collect();

        for file in &discovered {
            if !self.path_index.contains_key(&file.rel_path) {
                let idx = self.topology.add_node(FileNode {
                    path: file.rel_path.clone(),
                    mtime_ms: file.mtime_ms,
                    includes: Vec::new(),
                });
                self.path_index.insert(file.rel_path.clone(), idx);
            }
        }

        // Read and resolve in parallel; the graph itself is only touched in
        // the serial merge below.
        let parser = IncludeParser::new();
        let parsed: Vec<(String, u64, Vec<String>)> = to_parse
            .par_iter()
            .map(|file| {
                let resolved = match std::fs::read_to_string(&file.abs_path) {
                    Ok(text) => parser
                        .extract(&text)
                        .iter()
                        .filter_map(|target| {
                            include::resolve_include(
                                target,
                                &file.rel_path,
                                &discovered_set,
                                &self.filename_index,
                            )
                        })
                        .collect(),
                    Err(e) => {
                        debug!("cannot read {}: {}", file.rel_path, e);
                        Vec::new()
                    }
                };
                (file.rel_path.clone(), file.mtime_ms, resolved)
            })
            .collect();

        let parsed_count = parsed.len();
        for (path, mtime_ms, includes) in parsed {
            self.apply_parse(&path, mtime_ms, includes);
        }

        info!(
            "graph build: {} files, {} parsed, {} removed",
            discovered.len(),
            parsed_count,
            removed.len()
        );

        Ok(BuildStats {
            discovered: discovered.len(),
            parsed: parsed_count,
            removed: removed.len(),
        })
    }

    fn rebuild_filename_index(&mut self, discovered: &[ScannedFile]) {
        self.filename_index.clear();
        for file in discovered {
            self.filename_index
                .entry(paths::lower_basename(&file.rel_path))
                .or_default()
                .push(file.rel_path.clone());
        }
    }

    /// Replaces a file's outgoing edges and metadata with a fresh parse.
    fn apply_parse(&mut self, path: &str, mtime_ms: u64, includes: Vec<String>) {
        let Some(&idx) = self.path_index.get(path) else {
            return;
        };

        let stale: Vec<_> = self
            .topology
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.id())
            .collect();
        for edge in stale {
            self.topology.remove_edge(edge);
        }

        for target in &includes {
            if let Some(&target_idx) = self.path_index.get(target) {
                if self.topology.find_edge(idx, target_idx).is_none() {
                    self.topology.add_edge(idx, target_idx, IncludeEdge);
                }
            }
        }

        let node = &mut self.topology[idx];
        node.mtime_ms = mtime_ms;
        node.includes = includes;
    }

    /// Rebuild closure of `changed`: the inputs plus every file reachable
    /// over reverse-dependency edges from the changed headers. Source-file
    /// changes do not propagate. With a project scope set, the result is
    /// filtered to it.
    pub fn affected(&self, changed: &[String]) -> HashSet<String> {
        let mut result: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        for raw in changed {
            let path = paths::normalize_separators(raw);
            if paths::is_header_path(&path) {
                queue.push_back(path.clone());
            }
            result.insert(path);
        }

        while let Some(path) = queue.pop_front() {
            let Some(&idx) = self.path_index.get(&path) else {
                continue;
            };
            for dependent_idx in self.topology.neighbors_directed(idx, Direction::Incoming) {
                let dependent = &self.topology[dependent_idx].path;
                if !result.contains(dependent) {
                    result.insert(dependent.clone());
                    if paths::is_header_path(dependent) {
                        queue.push_back(dependent.clone());
                    }
                }
            }
        }

        if let Some(scope) = &self.project_scope {
            result.retain(|path| scope.contains(path));
        }
        result
    }

    /// Number of files that directly include `path`.
    pub fn dependent_count(&self, path: &str) -> usize {
        self.path_index
            .get(path)
            .map(|&idx| {
                self.topology
                    .neighbors_directed(idx, Direction::Incoming)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Denominator for impact percentages: the project scope when one is
    /// configured, the discovered file set otherwise.
    pub fn total_files(&self) -> usize {
        match &self.project_scope {
            Some(scope) => scope.len(),
            None => self.path_index.len(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.path_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.path_index.contains_key(path)
    }

    pub fn file_paths(&self) -> impl Iterator<Item = &String> {
        self.path_index.keys()
    }

    /// Restores nodes, edges and the filename index from a snapshot. Returns
    /// `false` (leaving the graph empty) when the snapshot belongs to a
    /// different root.
    pub fn load_cache(&mut self, cache: GraphCache) -> bool {
        if cache.root_path != self.root.to_string_lossy() {
            debug!(
                "cache root {} does not match workspace {}, discarding",
                cache.root_path,
                self.root.display()
            );
            return false;
        }

        self.topology.clear();
        self.path_index.clear();
        self.filename_index.clear();

        for (path, entry) in &cache.files {
            let idx = self.topology.add_node(FileNode {
                path: path.clone(),
                mtime_ms: entry.mtime,
                includes: entry.includes.clone(),
            });
            self.path_index.insert(path.clone(), idx);
            self.filename_index
                .entry(paths::lower_basename(path))
                .or_default()
                .push(path.clone());
        }

        for (path, entry) in cache.files {
            let from = self.path_index[&path];
            for target in entry.includes {
                if let Some(&to) = self.path_index.get(&target) {
                    if self.topology.find_edge(from, to).is_none() {
                        self.topology.add_edge(from, to, IncludeEdge);
                    }
                }
            }
        }
        true
    }

    pub fn to_cache(&self) -> GraphCache {
        let files = self
            .topology
            .node_weights()
            .map(|node| {
                (
                    node.path.clone(),
                    CachedFile {
                        mtime: node.mtime_ms,
                        includes: node.includes.clone(),
                    },
                )
            })
            .collect();
        GraphCache {
            root_path: self.root.to_string_lossy().into_owned(),
            built_at: chrono::Utc::now().to_rfc3339(),
            files,
        }
    }
}
