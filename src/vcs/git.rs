// src/vcs/git.rs
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::VersionControl;
use crate::error::{Result, ReviewError};

/// `git` subprocess wrapper rooted at a repository.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checks if the root is inside a git work tree.
    #[must_use]
    pub fn in_repo(&self) -> bool {
        Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(&self.root)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// # Errors
    /// Returns error if `git rev-parse` fails.
    pub fn current_branch(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    /// # Errors
    /// Returns error if `git rev-parse` fails.
    pub fn short_head(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "--short", "HEAD"])?.trim().to_string())
    }

    /// Creates and checks out `review-gate/<unix-secs>-<short-sha>`.
    ///
    /// # Errors
    /// Returns error if the branch cannot be created.
    pub fn create_review_branch(&self) -> Result<String> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let sha = self.short_head().unwrap_or_else(|_| "unknown".to_string());
        let branch = format!("review-gate/{secs}-{sha}");
        self.run(&["checkout", "-b", &branch])?;
        Ok(branch)
    }

    /// Runs `git <args>` in the root and returns stdout.
    ///
    /// # Errors
    /// Returns error if git cannot be spawned or exits non-zero.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        debug!(args = %args.join(" "), "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| ReviewError::io(e, &self.root))?;

        if !output.status.success() {
            return Err(ReviewError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for Git {
    fn stage(&self, paths: &[String]) -> Result<()> {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).map(|_| ())
    }

    fn commit(&self, subject: &str, body: &str, paths: &[String]) -> Result<()> {
        let mut args = vec!["commit", "-m", subject, "-m", body, "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).map(|_| ())
    }
}
