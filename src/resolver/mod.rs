//! Module detection and grouping.
//!
//! Four strategies produce `ModuleDescriptor`s: descriptors pre-built by the
//! project-file parser, `*.Build.cs` buildscripts, CMake targets, and a
//! directory-layout fallback. `auto` tries them in that order and keeps the
//! first that yields at least one module.

pub mod strategy;

use crate::config::ModuleDetection;
use crate::graph::scanner::ScanOptions;
use crate::model::{ModuleDescriptor, ModuleImpact};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::info;

#[derive(Default)]
pub struct ModuleResolver {
    /// Name-ordered so reverse-index registration is deterministic.
    modules: BTreeMap<String, ModuleDescriptor>,
    /// File -> owning module; the first-registered module wins.
    file_owner: HashMap<String, String>,
}

impl ModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect(
        &mut self,
        root: &Path,
        detection: ModuleDetection,
        prebuilt: &BTreeMap<String, ModuleDescriptor>,
        all_files: &HashSet<String>,
        options: &ScanOptions,
    ) {
        let detected = match detection {
            ModuleDetection::None => BTreeMap::new(),
            ModuleDetection::ProjectFile => prebuilt.clone(),
            ModuleDetection::Buildscript => strategy::buildscript::detect(root, options, all_files),
            ModuleDetection::Cmake => strategy::cmake::detect(root, options, all_files),
            ModuleDetection::Directory => strategy::directory::detect(all_files),
            ModuleDetection::Auto => {
                let mut detected = prebuilt.clone();
                if detected.is_empty() {
                    detected = strategy::buildscript::detect(root, options, all_files);
                }
                if detected.is_empty() {
                    detected = strategy::cmake::detect(root, options, all_files);
                }
                if detected.is_empty() {
                    detected = strategy::directory::detect(all_files);
                }
                detected
            }
        };

        self.adopt(detected);
    }

    /// Installs descriptors and rebuilds the file-to-module reverse index.
    pub fn adopt(&mut self, modules: BTreeMap<String, ModuleDescriptor>) {
        self.modules = modules;
        self.file_owner.clear();
        for (name, descriptor) in &self.modules {
            for file in &descriptor.files {
                self.file_owner
                    .entry(file.clone())
                    .or_insert_with(|| name.clone());
            }
        }
        if !self.modules.is_empty() {
            info!("resolved {} modules", self.modules.len());
        }
    }

    pub fn modules(&self) -> &BTreeMap<String, ModuleDescriptor> {
        &self.modules
    }

    pub fn resolve_file_module(&self, path: &str) -> Option<&str> {
        self.file_owner.get(path).map(String::as_str)
    }

    /// Buckets an affected file set by owning module, most-affected first.
    pub fn group(&self, affected: &HashSet<String>) -> Vec<ModuleImpact> {
        let mut grouped: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for file in affected {
            if let Some(module) = self.file_owner.get(file) {
                grouped.entry(module.as_str()).or_default().push(file.clone());
            }
        }

        let mut impacts: Vec<ModuleImpact> = grouped
            .into_iter()
            .map(|(name, mut files)| {
                files.sort();
                let descriptor = &self.modules[name];
                ModuleImpact {
                    name: descriptor.name.clone(),
                    root_path: descriptor.root_path.clone(),
                    kind: descriptor.kind,
                    total_files: descriptor.files.len(),
                    affected_files_count: files.len(),
                    affected_files: files,
                }
            })
            .collect();

        impacts.sort_by(|a, b| {
            b.affected_files_count
                .cmp(&a.affected_files_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        impacts
    }
}
