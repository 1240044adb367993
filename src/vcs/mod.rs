//! Version-control boundary.
//!
//! The analyzer only ever sees `CommitInfo` values; how they are produced is
//! the provider's business. `GitCli` is the stock implementation used by the
//! command-line binary.

pub mod git;

pub use git::GitCli;

use crate::error::Result;
use crate::model::CommitInfo;

pub trait CommitProvider {
    /// Commits present on the tracked upstream but not on the local working
    /// reference. An empty list is a valid zero-impact input.
    fn incoming_commits(&self) -> Result<Vec<CommitInfo>>;

    /// Total tracked-file count, the denominator fallback for workspaces
    /// without any C/C++ files.
    fn tracked_file_count(&self) -> Result<usize>;
}
