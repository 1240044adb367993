//! Buildscript module detection.
//!
//! Unreal-style projects declare a module per `<Name>.Build.cs` file; the
//! containing directory owns every C/C++ file beneath it.

use super::files_under;
use crate::graph::scanner::{ScanOptions, WorkspaceScanner};
use crate::model::{ModuleDescriptor, ModuleKind};
use crate::paths;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

pub const BUILDSCRIPT_SUFFIX: &str = ".Build.cs";

pub fn detect(
    root: &Path,
    options: &ScanOptions,
    all_files: &HashSet<String>,
) -> BTreeMap<String, ModuleDescriptor> {
    let scanner = WorkspaceScanner::new(root, options);
    let buildscripts = scanner.find_files(|basename| basename.ends_with(BUILDSCRIPT_SUFFIX));

    let mut modules = BTreeMap::new();
    for script in buildscripts {
        let basename = paths::basename_of(&script);
        let name = basename[..basename.len() - BUILDSCRIPT_SUFFIX.len()].to_string();
        if name.is_empty() {
            continue;
        }
        let dir = paths::parent_of(&script).to_string();
        modules.entry(name.clone()).or_insert_with(|| {
            ModuleDescriptor::new(name, dir.clone(), ModuleKind::Buildscript, files_under(&dir, all_files))
        });
    }
    modules
}
