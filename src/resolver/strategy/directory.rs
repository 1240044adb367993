//! Directory-layout fallback detection.
//!
//! Probes the usual source-root names; when one exists, files are bucketed
//! by the immediate child of that root, otherwise by their first path
//! component. Tiny buckets are noise, not modules.

use crate::model::{ModuleDescriptor, ModuleKind};
use std::collections::{BTreeMap, HashSet};

/// Buckets below this size are discarded. A tuning constant, not a law.
pub const MIN_DIRECTORY_MODULE_FILES: usize = 2;

const SOURCE_ROOT_CANDIDATES: &[&str] = &["Source", "src", "Src", "source"];

pub fn detect(all_files: &HashSet<String>) -> BTreeMap<String, ModuleDescriptor> {
    let source_root = SOURCE_ROOT_CANDIDATES
        .iter()
        .find(|candidate| {
            let prefix = format!("{candidate}/");
            all_files.iter().any(|f| f.starts_with(&prefix))
        })
        .copied();

    let mut buckets: BTreeMap<String, (String, HashSet<String>)> = BTreeMap::new();
    for file in all_files {
        let Some((name, module_root)) = bucket_of(file, source_root) else {
            continue;
        };
        buckets
            .entry(name)
            .or_insert_with(|| (module_root, HashSet::new()))
            .1
            .insert(file.clone());
    }

    buckets
        .into_iter()
        .filter(|(_, (_, files))| files.len() >= MIN_DIRECTORY_MODULE_FILES)
        .map(|(name, (root_path, files))| {
            let descriptor =
                ModuleDescriptor::new(name.clone(), root_path, ModuleKind::Directory, files);
            (name, descriptor)
        })
        .collect()
}

fn bucket_of(file: &str, source_root: Option<&str>) -> Option<(String, String)> {
    match source_root {
        Some(root) => {
            let rest = file.strip_prefix(root)?.strip_prefix('/')?;
            let (child, _) = rest.split_once('/')?;
            Some((child.to_string(), format!("{root}/{child}")))
        }
        None => {
            let (first, _) = file.split_once('/')?;
            Some((first.to_string(), first.to_string()))
        }
    }
}
