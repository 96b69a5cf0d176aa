// src/vcs/tree.rs
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use super::DiffSource;
use crate::error::Result;
use crate::lang;
use crate::types::{ChangeStatus, ChangedFile, Changeset};

/// Base label of a whole-tree changeset.
pub const WORKTREE_BASE: &str = "WORKTREE";

/// Treats every source file under the root as added.
///
/// Used to review a tree that has no base to diff against.
#[derive(Debug, Clone)]
pub struct WorkspaceTree {
    root: PathBuf,
    pruned: Vec<String>,
}

impl WorkspaceTree {
    /// `pruned` names directories never descended into (e.g. `node_modules`).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, pruned: &[String]) -> Self {
        Self { root: root.into(), pruned: pruned.to_vec() }
    }

    fn should_prune(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.pruned.iter().any(|p| *p == name)
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        Some(rel.to_string_lossy().replace('\\', "/"))
    }
}

impl DiffSource for WorkspaceTree {
    fn collect(&self) -> Result<Changeset> {
        let mut files = Vec::new();
        let mut errors = 0usize;

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.should_prune(e));

        for entry in walker {
            let Ok(entry) = entry else {
                errors += 1;
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rel) = self.relative(entry.path()) else { continue };
            if lang::is_graph_source(&rel) {
                files.push(ChangedFile::new(&rel, ChangeStatus::Added));
            }
        }

        if errors > 0 {
            warn!(errors, "entries skipped during tree walk");
        }
        info!(files = files.len(), "workspace tree collected");
        Ok(Changeset::new(WORKTREE_BASE, files))
    }
}
