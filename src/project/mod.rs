//! Build-scope resolution from Visual Studio solution and project files.
//!
//! The scope set is the denominator of every impact percentage; each parsed
//! project also yields a pre-built module descriptor. Malformed or missing
//! files degrade to an empty scope with a warning, never to a failed run.

pub mod solution;
pub mod vcxproj;

use crate::model::ModuleDescriptor;
use crate::paths;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default)]
pub struct ProjectScope {
    pub files: HashSet<String>,
    pub modules: BTreeMap<String, ModuleDescriptor>,
}

impl ProjectScope {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Parses the configured solution or project file. `project_file` is
/// workspace-relative.
pub fn parse_project_scope(root: &Path, project_file: &str) -> ProjectScope {
    let rel = paths::normalize_separators(project_file);
    match paths::extension_of(&rel).as_deref() {
        Some("sln") => solution::parse_solution(root, &rel),
        Some("vcxproj") => {
            let mut scope = ProjectScope::default();
            if let Some(module) = vcxproj::parse_vcxproj(root, &rel, None) {
                scope.files.extend(module.files.iter().cloned());
                scope.modules.insert(module.name.clone(), module);
            }
            scope
        }
        _ => {
            warn!("unsupported project file {}, ignoring", project_file);
            ProjectScope::default()
        }
    }
}
