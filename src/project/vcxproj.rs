//! `.vcxproj` parsing.
//!
//! Extracts `<ClCompile Include="…">` and `<ClInclude Include="…">` items,
//! resolves them relative to the project file's directory, and discards
//! anything that escapes the workspace.

use crate::model::{ModuleDescriptor, ModuleKind};
use crate::paths;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Returns `None` when the project file cannot be read. `name` defaults to
/// the project file's stem.
pub fn parse_vcxproj(root: &Path, project_rel: &str, name: Option<&str>) -> Option<ModuleDescriptor> {
    let text = match std::fs::read_to_string(root.join(project_rel)) {
        Ok(text) => text,
        Err(e) => {
            warn!("cannot read project {}: {}", project_rel, e);
            return None;
        }
    };

    let item_re = Regex::new(r#"(?i)<\s*(?:ClCompile|ClInclude)\s+Include\s*=\s*"([^"]+)""#).unwrap();
    let project_dir = paths::parent_of(project_rel);

    let mut files = HashSet::new();
    for caps in item_re.captures_iter(&text) {
        let raw = paths::normalize_separators(&caps[1]);
        let rel = paths::join_normalized(project_dir, &raw);
        if rel.starts_with("..") {
            debug!("{}: item {} escapes the workspace, dropped", project_rel, raw);
            continue;
        }
        files.insert(rel);
    }

    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| stem_of(project_rel));

    Some(ModuleDescriptor::new(
        name,
        project_dir,
        ModuleKind::ProjectFile,
        files,
    ))
}

fn stem_of(project_rel: &str) -> String {
    let basename = paths::basename_of(project_rel);
    basename
        .rsplit_once('.')
        .map(|(stem, _)| stem.to_string())
        .unwrap_or_else(|| basename.to_string())
}
