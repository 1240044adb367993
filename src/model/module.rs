use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a module was detected. Closed set; consumers switch on it when
/// formatting, nothing dispatches dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    ProjectFile,
    Buildscript,
    CmakeTarget,
    Directory,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::ProjectFile => "project_file",
            ModuleKind::Buildscript => "buildscript",
            ModuleKind::CmakeTarget => "cmake_target",
            ModuleKind::Directory => "directory",
        }
    }
}

/// A logical grouping of files used for human-oriented impact summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    /// Workspace-relative directory the module is rooted at.
    pub root_path: String,
    pub kind: ModuleKind,
    pub files: HashSet<String>,
}

impl ModuleDescriptor {
    pub fn new(
        name: impl Into<String>,
        root_path: impl Into<String>,
        kind: ModuleKind,
        files: HashSet<String>,
    ) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
            kind,
            files,
        }
    }
}
