pub mod change;
pub mod module;
pub mod report;

pub use change::{ChangeKind, CommitInfo, FileChange};
pub use module::{ModuleDescriptor, ModuleKind};
pub use report::{CommitImpact, ImpactReport, ImpactSeverity, ModuleImpact};
