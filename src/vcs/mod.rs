// src/vcs/mod.rs
//! Version-control collaborators: changeset source and fix commits.

mod diff;
mod git;
mod tree;

pub use diff::{parse_name_status, parse_numstat, GitDiff};
pub use git::Git;
pub use tree::{WorkspaceTree, WORKTREE_BASE};

use crate::error::Result;
use crate::types::Changeset;

/// Supplies the changeset under review.
pub trait DiffSource {
    /// # Errors
    /// Returns error if the changeset cannot be computed.
    fn collect(&self) -> Result<Changeset>;
}

/// Stages and commits files in the working tree.
pub trait VersionControl {
    /// # Errors
    /// Returns error if staging fails.
    fn stage(&self, paths: &[String]) -> Result<()>;

    /// Commits `paths` only. Anything else already staged stays staged.
    ///
    /// # Errors
    /// Returns error if the commit fails.
    fn commit(&self, subject: &str, body: &str, paths: &[String]) -> Result<()>;
}
