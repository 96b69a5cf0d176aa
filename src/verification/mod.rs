//! Test-suite collaborator.
//!
//! Runs the command from the `[tests]` section of reviewgate.toml under a
//! wall-clock deadline.

mod runner;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::TestsConfig;
use crate::types::TestOutcome;

pub use runner::run_with_timeout;

/// Runs the project's tests.
pub trait TestSuite {
    /// Never fails: spawn errors and timeouts are failed outcomes.
    fn run(&self) -> TestOutcome;
}

/// A shell-quoted command run in the repository root.
#[derive(Debug, Clone)]
pub struct CommandSuite {
    root: PathBuf,
    command: String,
    timeout: Duration,
}

impl CommandSuite {
    #[must_use]
    pub fn new(root: &Path, command: &str, timeout: Duration) -> Self {
        Self { root: root.to_path_buf(), command: command.to_string(), timeout }
    }

    #[must_use]
    pub fn from_config(root: &Path, config: &TestsConfig) -> Self {
        Self::new(root, &config.command, config.timeout())
    }
}

impl TestSuite for CommandSuite {
    fn run(&self) -> TestOutcome {
        run_with_timeout(&self.root, &self.command, self.timeout)
    }
}
