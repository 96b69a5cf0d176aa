// src/vcs/diff.rs
use tracing::{debug, info};

use super::{DiffSource, Git};
use crate::error::Result;
use crate::types::{ChangeStatus, ChangedFile, Changeset};

/// Changes on `HEAD` since it diverged from `base`.
#[derive(Debug, Clone)]
pub struct GitDiff<'a> {
    git: &'a Git,
    base: String,
}

impl<'a> GitDiff<'a> {
    #[must_use]
    pub fn new(git: &'a Git, base: &str) -> Self {
        Self { git, base: base.to_string() }
    }
}

impl DiffSource for GitDiff<'_> {
    fn collect(&self) -> Result<Changeset> {
        let range = format!("{}...HEAD", self.base);
        let names = self.git.run(&["diff", "--name-status", &range])?;
        let stats = self.git.run(&["diff", "--numstat", &range])?;

        let mut changeset = Changeset::new(&self.base, parse_name_status(&names));
        (changeset.additions, changeset.deletions) = parse_numstat(&stats);
        info!(
            files = changeset.total_files(),
            additions = changeset.additions,
            deletions = changeset.deletions,
            "changeset collected"
        );
        Ok(changeset)
    }
}

/// Parses `git diff --name-status` output. Unknown status letters are skipped.
#[must_use]
pub fn parse_name_status(output: &str) -> Vec<ChangedFile> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let code = fields.next()?.trim();
            let status = ChangeStatus::from_git_letter(code)?;
            let first = fields.next()?;
            let file = match (status, fields.next()) {
                (ChangeStatus::Renamed, Some(new)) => ChangedFile::renamed(first, new),
                // Copies keep the source and report the destination as added.
                (ChangeStatus::Added, Some(dest)) => ChangedFile::new(dest, status),
                _ => ChangedFile::new(first, status),
            };
            Some(file)
        })
        .inspect(|f| debug!(file = %f.path(), status = ?f.status(), "changed"))
        .collect()
}

/// Sums `git diff --numstat` output. Binary entries (`-`) count as zero.
#[must_use]
pub fn parse_numstat(output: &str) -> (usize, usize) {
    output.lines().fold((0, 0), |(adds, dels), line| {
        let mut fields = line.split('\t');
        let a = fields.next().and_then(|n| n.parse::<usize>().ok()).unwrap_or(0);
        let d = fields.next().and_then(|n| n.parse::<usize>().ok()).unwrap_or(0);
        (adds + a, dels + d)
    })
}
