//! `.sln` parsing.
//!
//! A solution file references its projects with lines of the form
//! `Project("{type-guid}") = "Name", "rel\path.vcxproj", "{guid}"`; each
//! referenced project that exists on disk contributes its file set to the
//! overall scope and one module descriptor.

use super::vcxproj;
use super::ProjectScope;
use crate::paths;
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

pub fn parse_solution(root: &Path, sln_rel: &str) -> ProjectScope {
    let mut scope = ProjectScope::default();

    let text = match std::fs::read_to_string(root.join(sln_rel)) {
        Ok(text) => text,
        Err(e) => {
            warn!("cannot read solution {}: {}", sln_rel, e);
            return scope;
        }
    };

    let project_re =
        Regex::new(r#"Project\("\{[^}]*\}"\)\s*=\s*"([^"]+)",\s*"([^"]+)""#).unwrap();
    let sln_dir = paths::parent_of(sln_rel);

    for caps in project_re.captures_iter(&text) {
        let name = caps[1].to_string();
        let raw_path = paths::normalize_separators(&caps[2]);
        if !raw_path.to_ascii_lowercase().ends_with(".vcxproj") {
            continue;
        }

        let project_rel = paths::join_normalized(sln_dir, &raw_path);
        if project_rel.starts_with("..") {
            debug!("project {} escapes the workspace, skipping", project_rel);
            continue;
        }
        if !root.join(&project_rel).exists() {
            debug!("referenced project {} does not exist, skipping", project_rel);
            continue;
        }

        if let Some(module) = vcxproj::parse_vcxproj(root, &project_rel, Some(&name)) {
            scope.files.extend(module.files.iter().cloned());
            scope.modules.insert(module.name.clone(), module);
        }
    }

    if scope.is_empty() {
        warn!("solution {} produced an empty build scope", sln_rel);
    }
    scope
}
