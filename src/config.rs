use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = ".buildscope.json";

/// Module detection strategy. `Auto` tries the others in declaration order
/// and keeps the first that yields at least one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModuleDetection {
    #[default]
    Auto,
    ProjectFile,
    Buildscript,
    Cmake,
    Directory,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Workspace-relative path to a `.sln` or `.vcxproj`; empty disables
    /// build-scope filtering.
    #[serde(default)]
    pub project_file: String,
    /// Consumed by editor shells to trigger an analysis on startup; the CLI
    /// ignores it.
    #[serde(default = "default_auto_scan")]
    pub auto_scan: bool,
    /// Non-empty limits scanning to these workspace-relative roots.
    #[serde(default)]
    pub include_paths: Vec<String>,
    /// Augments the built-in directory skip list.
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    #[serde(default)]
    pub module_detection: ModuleDetection,
}

fn default_auto_scan() -> bool {
    true
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            project_file: String::new(),
            auto_scan: true,
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            module_detection: ModuleDetection::Auto,
        }
    }
}

impl AnalyzerConfig {
    /// Reads `.buildscope.json` from the workspace root, falling back to
    /// defaults when the file is absent or malformed.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE_NAME);
        let Ok(text) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring malformed {}: {}", CONFIG_FILE_NAME, e);
                Self::default()
            }
        }
    }
}
