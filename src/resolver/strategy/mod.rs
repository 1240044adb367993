pub mod buildscript;
pub mod cmake;
pub mod directory;

use std::collections::HashSet;

/// Files belonging to a module rooted at `dir` (workspace-relative).
pub(crate) fn files_under(dir: &str, all_files: &HashSet<String>) -> HashSet<String> {
    if dir.is_empty() {
        return all_files.clone();
    }
    let prefix = format!("{dir}/");
    all_files
        .iter()
        .filter(|f| f.starts_with(&prefix))
        .cloned()
        .collect()
}
