//! CMake target detection.
//!
//! Every `CMakeLists.txt` is searched for `add_library(<name> …)` and
//! `add_executable(<name> …)`; the containing directory becomes the module
//! root. Names starting with `$` (variable references) or `#` (commented-out
//! calls the regex would otherwise pick up) are skipped, and the first-seen
//! occurrence of a target name wins.

use super::files_under;
use crate::graph::scanner::{ScanOptions, WorkspaceScanner};
use crate::model::{ModuleDescriptor, ModuleKind};
use crate::paths;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

pub fn detect(
    root: &Path,
    options: &ScanOptions,
    all_files: &HashSet<String>,
) -> BTreeMap<String, ModuleDescriptor> {
    let scanner = WorkspaceScanner::new(root, options);
    let lists = scanner.find_files(|basename| basename == "CMakeLists.txt");

    let target_re = Regex::new(r"(?i)add_(?:library|executable)\s*\(\s*([^\s()]+)").unwrap();

    let mut modules = BTreeMap::new();
    for list in lists {
        let text = match std::fs::read_to_string(root.join(&list)) {
            Ok(text) => text,
            Err(e) => {
                debug!("cannot read {}: {}", list, e);
                continue;
            }
        };

        let dir = paths::parent_of(&list).to_string();
        for caps in target_re.captures_iter(&text) {
            let name = caps[1].to_string();
            if name.starts_with('$') || name.starts_with('#') {
                continue;
            }
            modules.entry(name.clone()).or_insert_with(|| {
                ModuleDescriptor::new(
                    name,
                    dir.clone(),
                    ModuleKind::CmakeTarget,
                    files_under(&dir, all_files),
                )
            });
        }
    }
    modules
}
