// src/fix/commit.rs
use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::types::FixResult;
use crate::vcs::VersionControl;

pub const COMMIT_SUBJECT: &str = "fix(review-gate): apply auto-fixes";

/// What happened when committing auto-fixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    Committed { files: Vec<String>, finding_ids: Vec<String> },
    NothingToCommit,
    /// Staging or committing failed; the review still completes.
    Failed { warning: String },
}

impl CommitOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Stages every file touched by a successful fix and commits them together.
///
/// No successful fix means no VCS call at all.
pub fn commit_fixes(vcs: &dyn VersionControl, results: &[FixResult], branch: &str) -> CommitOutcome {
    let fixed: Vec<&FixResult> = results.iter().filter(|r| r.success).collect();
    let files: Vec<String> = fixed
        .iter()
        .flat_map(|r| r.files_modified.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if files.is_empty() {
        return CommitOutcome::NothingToCommit;
    }

    let finding_ids: Vec<String> = fixed.iter().map(|r| r.finding_id.clone()).collect();
    let body = commit_body(branch, &finding_ids);

    let attempt = vcs.stage(&files).and_then(|()| vcs.commit(COMMIT_SUBJECT, &body, &files));
    match attempt {
        Ok(()) => {
            info!(files = files.len(), fixes = finding_ids.len(), "auto-fixes committed");
            CommitOutcome::Committed { files, finding_ids }
        }
        Err(e) => {
            warn!(error = %e, "could not commit auto-fixes");
            CommitOutcome::Failed { warning: e.to_string() }
        }
    }
}

fn commit_body(branch: &str, finding_ids: &[String]) -> String {
    let mut body = format!("Branch: {branch}\n\nFixed {} finding(s):\n", finding_ids.len());
    for id in finding_ids {
        body.push_str("- ");
        body.push_str(id);
        body.push('\n');
    }
    body
}
