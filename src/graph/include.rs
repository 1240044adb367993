//! `#include "…"` extraction and resolution.
//!
//! Extraction is a line-anchored regex over the file text. Angle-bracket
//! includes are system headers and intentionally not matched; preprocessor
//! conditionals and macro-generated includes are out of scope, so the edge
//! set is an approximation in both directions.

use crate::paths;
use regex::Regex;
use std::collections::{HashMap, HashSet};

pub struct IncludeParser {
    pattern: Regex,
}

impl IncludeParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r#"(?m)^\s*#\s*include\s*"([^"]+)""#).unwrap(),
        }
    }

    /// Raw quoted include targets in file order, separator-normalized.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .map(|caps| paths::normalize_separators(&caps[1]))
            .collect()
    }
}

impl Default for IncludeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves one include target against the discovered file set.
///
/// Tries, in order: a sibling of the including file, a workspace-root-relative
/// path, then a fuzzy match over files sharing the target's basename. The
/// fuzzy step prefers a candidate whose relative path ends with the include
/// string so `"Module/Foo.h"` picks `src/Module/Foo.h` over some other
/// `Foo.h`; a lone candidate wins by default. Unresolvable targets are
/// treated as system headers and dropped by the caller.
pub fn resolve_include(
    target: &str,
    including_file: &str,
    files: &HashSet<String>,
    filename_index: &HashMap<String, Vec<String>>,
) -> Option<String> {
    let sibling = paths::join_normalized(paths::parent_of(including_file), target);
    if files.contains(&sibling) {
        return Some(sibling);
    }

    let from_root = paths::join_normalized("", target);
    if files.contains(&from_root) {
        return Some(from_root);
    }

    let candidates = filename_index.get(&paths::lower_basename(target))?;
    if let Some(suffix_match) = candidates.iter().find(|c| c.ends_with(target)) {
        return Some(suffix_match.clone());
    }
    if candidates.len() == 1 {
        return Some(candidates[0].clone());
    }
    None
}
