use super::change::CommitInfo;
use super::module::ModuleKind;
use serde::Serialize;

/// Published coloring thresholds for impact percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactSeverity {
    pub fn from_pct(pct: f64) -> Self {
        if pct < 10.0 {
            ImpactSeverity::Low
        } else if pct < 30.0 {
            ImpactSeverity::Medium
        } else if pct < 50.0 {
            ImpactSeverity::High
        } else {
            ImpactSeverity::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactSeverity::Low => "low",
            ImpactSeverity::Medium => "medium",
            ImpactSeverity::High => "high",
            ImpactSeverity::Critical => "critical",
        }
    }
}

/// Per-module share of an affected file set, sorted most-affected first.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleImpact {
    pub name: String,
    pub root_path: String,
    pub kind: ModuleKind,
    pub total_files: usize,
    pub affected_files_count: usize,
    pub affected_files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitImpact {
    pub commit: CommitInfo,
    pub impact_pct: f64,
    /// Normalized paths the commit touched.
    pub changed_files: Vec<String>,
    /// Rebuild closure of `changed_files`, sorted.
    pub rebuild_files: Vec<String>,
    pub affected_modules: Vec<ModuleImpact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    pub global_impact_pct: f64,
    pub severity: ImpactSeverity,
    pub total_project_files: usize,
    pub total_affected_files: usize,
    pub commit_impacts: Vec<CommitImpact>,
    /// Union of every commit's rebuild closure, sorted.
    pub all_rebuild_files: Vec<String>,
    pub total_modules: usize,
    pub affected_module_count: usize,
    pub module_impacts: Vec<ModuleImpact>,
}
