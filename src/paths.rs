//! Path classification and normalization helpers.
//!
//! Every path flowing through the analyzer is workspace-relative with forward
//! slashes; these helpers are the single place that knows about extension
//! sets and separator rules.

use std::path::Path;

/// Extensions of translation units.
pub const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c"];

/// Extensions whose changes propagate through the include graph.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hxx", "hh", "inl", "ipp"];

/// Lowercased extension of a forward-slash path, if any.
pub fn extension_of(path: &str) -> Option<String> {
    let basename = basename_of(path);
    let (stem, ext) = basename.rsplit_once('.')?;
    if stem.is_empty() {
        // Dotfiles like ".clang-format" have no extension
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn is_tracked_extension(ext: &str) -> bool {
    SOURCE_EXTENSIONS.contains(&ext) || HEADER_EXTENSIONS.contains(&ext)
}

pub fn is_header_path(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_tracked_path(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| is_tracked_extension(&ext))
}

/// Converts backslashes to forward slashes and strips a leading `./`.
pub fn normalize_separators(raw: &str) -> String {
    let normalized = raw.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .map(str::to_string)
        .unwrap_or(normalized)
}

pub fn basename_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lowercased basename, the key of the fuzzy-resolution filename index.
pub fn lower_basename(path: &str) -> String {
    basename_of(path).to_ascii_lowercase()
}

/// Directory part of a forward-slash relative path; empty for root-level files.
pub fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Logically joins `rel` onto `base` (both forward-slash, workspace-relative),
/// collapsing `.` and `..` components. `..` components that escape the
/// workspace are preserved so callers can reject them.
pub fn join_normalized(base: &str, rel: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    let mut escapes = 0usize;

    for component in base.split('/').chain(rel.split('/')) {
        match component {
            "" | "." => {}
            ".." => {
                if stack.is_empty() {
                    escapes += 1;
                } else {
                    stack.pop();
                }
            }
            other => stack.push(other),
        }
    }

    let mut parts: Vec<&str> = Vec::with_capacity(escapes + stack.len());
    parts.extend(std::iter::repeat("..").take(escapes));
    parts.extend(stack);
    parts.join("/")
}

/// Workspace-relative forward-slash form of `abs`, or `None` when `abs` is
/// not under `root`.
pub fn workspace_relative(abs: &Path, root: &Path) -> Option<String> {
    let rel = abs.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    Some(out)
}
