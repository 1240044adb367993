//! The analysis pipeline.
//!
//! One analysis runs at a time; phases execute strictly in order (scope parse,
//! graph warm load, scan and diff, include parse, commit enumeration,
//! per-commit closure) and the graph is only ever mutated here.

use crate::config::{AnalyzerConfig, ModuleDetection};
use crate::error::{BuildscopeError, Result};
use crate::graph::cache::CacheStore;
use crate::graph::scanner::ScanOptions;
use crate::graph::{BuildStats, DependencyGraph};
use crate::model::{CommitImpact, ImpactReport, ImpactSeverity, ModuleDescriptor};
use crate::paths;
use crate::project;
use crate::resolver::ModuleResolver;
use crate::vcs::CommitProvider;
use super::estimator::percentage;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

static ANALYSIS_IN_PROGRESS: AtomicBool = AtomicBool::new(false);

/// Single-slot run permit; released on drop.
struct RunGuard;

impl RunGuard {
    fn acquire() -> Result<Self> {
        if ANALYSIS_IN_PROGRESS
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BuildscopeError::AnalysisInProgress);
        }
        Ok(Self)
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        ANALYSIS_IN_PROGRESS.store(false, Ordering::SeqCst);
    }
}

pub struct ChangeAnalyzer {
    root: PathBuf,
    config: AnalyzerConfig,
    cache_store: CacheStore,
}

impl ChangeAnalyzer {
    pub fn new(root: &Path, config: AnalyzerConfig) -> Result<Self> {
        let root = root.canonicalize()?;
        let cache_store = CacheStore::new(&root);
        Ok(Self {
            root,
            config,
            cache_store,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parses the build scope (when configured), warm-starts the graph from
    /// cache, scans, and persists the refreshed snapshot. Shared by `analyze`
    /// and the standalone `index` command.
    pub fn refresh_graph(
        &self,
    ) -> Result<(DependencyGraph, BuildStats, BTreeMap<String, ModuleDescriptor>)> {
        let mut prebuilt = BTreeMap::new();
        let mut scope_files: Option<HashSet<String>> = None;

        if !self.config.project_file.is_empty() {
            info!("parsing build scope from {}", self.config.project_file);
            let scope = project::parse_project_scope(&self.root, &self.config.project_file);
            if !scope.is_empty() {
                scope_files = Some(scope.files);
            }
            prebuilt = scope.modules;
        }

        let mut graph = DependencyGraph::new(self.root.clone());
        if let Some(cache) = self.cache_store.load() {
            if graph.load_cache(cache) {
                info!("warm-started graph from cache ({} files)", graph.file_count());
            }
        }
        graph.set_project_scope(scope_files);

        let options = self.scan_options();
        let stats = graph.build(&options)?;

        if let Err(e) = self.cache_store.save(&graph.to_cache()) {
            warn!("failed to persist graph cache: {}", e);
        }

        Ok((graph, stats, prebuilt))
    }

    pub fn analyze(&self, provider: &dyn CommitProvider) -> Result<ImpactReport> {
        let _guard = RunGuard::acquire()?;

        let (graph, _stats, prebuilt) = self.refresh_graph()?;

        info!("enumerating incoming commits");
        let commits = provider.incoming_commits()?;

        let mut resolver = ModuleResolver::new();
        if self.config.module_detection != ModuleDetection::None {
            let all_files: HashSet<String> = graph.file_paths().cloned().collect();
            resolver.detect(
                &self.root,
                self.config.module_detection,
                &prebuilt,
                &all_files,
                &self.scan_options(),
            );
        }

        // Non-C/C++ workspaces fall back to the tracked-file count and skip
        // closure expansion entirely.
        let graph_total = graph.total_files();
        let (denominator, graph_based) = if graph_total > 0 {
            (graph_total, true)
        } else {
            (provider.tracked_file_count()?, false)
        };

        let mut all_rebuild: HashSet<String> = HashSet::new();
        let mut commit_impacts: Vec<CommitImpact> = Vec::new();

        for commit in commits {
            let changed: Vec<String> = commit
                .changed_files
                .iter()
                .map(|change| paths::normalize_separators(&change.path))
                .collect();

            let rebuild: HashSet<String> = if graph_based {
                graph.affected(&changed)
            } else {
                changed.iter().cloned().collect()
            };

            info!(
                "commit {}: {} changed, {} to rebuild",
                commit.short_id,
                changed.len(),
                rebuild.len()
            );

            all_rebuild.extend(rebuild.iter().cloned());
            let affected_modules = resolver.group(&rebuild);
            let mut rebuild_files: Vec<String> = rebuild.into_iter().collect();
            rebuild_files.sort();

            commit_impacts.push(CommitImpact {
                impact_pct: percentage(rebuild_files.len(), denominator),
                commit,
                changed_files: changed,
                rebuild_files,
                affected_modules,
            });
        }

        let module_impacts = resolver.group(&all_rebuild);
        let global_impact_pct = percentage(all_rebuild.len(), denominator);
        let mut all_rebuild_files: Vec<String> = all_rebuild.into_iter().collect();
        all_rebuild_files.sort();

        Ok(ImpactReport {
            global_impact_pct,
            severity: ImpactSeverity::from_pct(global_impact_pct),
            total_project_files: denominator,
            total_affected_files: all_rebuild_files.len(),
            commit_impacts,
            all_rebuild_files,
            total_modules: resolver.modules().len(),
            affected_module_count: module_impacts.len(),
            module_impacts,
        })
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_paths: self.config.include_paths.clone(),
            exclude_paths: self.config.exclude_paths.clone(),
        }
    }
}
