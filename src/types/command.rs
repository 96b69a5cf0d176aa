//! Result of an external test-suite run.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Trailing characters of output kept as the error excerpt.
const ERROR_EXCERPT_CHARS: usize = 500;

static TOTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) total").unwrap_or_else(|_| panic!("Invalid Regex")));

/// Outcome of running the project's test suite.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    /// The command that was executed (display form).
    command: String,
    /// Whether the suite passed (exit code 0, not timed out).
    passed: bool,
    /// Process exit code (`None` when killed or never started).
    exit_code: Option<i32>,
    /// Total tests as reported by the runner summary, 0 if unknown.
    total_tests: usize,
    /// Test files reported as failing.
    failed_files: Vec<String>,
    /// Tail of the combined output, or the failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    /// Whether the run was killed at the deadline.
    timed_out: bool,
    /// Execution time in milliseconds.
    duration_ms: u64,
}

impl TestOutcome {
    /// Builds an outcome from a finished process.
    #[must_use]
    pub fn finished(command: &str, exit_code: Option<i32>, output: &str, duration_ms: u64) -> Self {
        let passed = exit_code == Some(0);
        Self {
            command: command.to_string(),
            passed,
            exit_code,
            total_tests: count_total(output),
            failed_files: extract_failed_files(output),
            error_message: if passed { None } else { Some(tail(output)) },
            timed_out: false,
            duration_ms,
        }
    }

    /// Builds an outcome for a run killed at the deadline.
    #[must_use]
    pub fn timed_out(command: &str, duration_ms: u64) -> Self {
        Self {
            command: command.to_string(),
            passed: false,
            exit_code: None,
            total_tests: 0,
            failed_files: Vec::new(),
            error_message: Some("Test execution timed out".to_string()),
            timed_out: true,
            duration_ms,
        }
    }

    /// Builds an outcome for a command that could not be started.
    #[must_use]
    pub fn not_started(command: &str, reason: &str) -> Self {
        Self {
            command: command.to_string(),
            passed: false,
            exit_code: None,
            total_tests: 0,
            failed_files: Vec::new(),
            error_message: Some(reason.to_string()),
            timed_out: false,
            duration_ms: 0,
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    #[must_use]
    pub fn total_tests(&self) -> usize {
        self.total_tests
    }

    #[must_use]
    pub fn failed_tests(&self) -> usize {
        self.failed_files.len()
    }

    #[must_use]
    pub fn failed_files(&self) -> &[String] {
        &self.failed_files
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Failed test files: tokens containing `.test.` on lines mentioning `FAIL`.
fn extract_failed_files(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.contains("FAIL") && line.contains(".test."))
        .flat_map(str::split_whitespace)
        .filter(|token| token.contains(".test."))
        .map(ToString::to_string)
        .collect()
}

fn count_total(output: &str) -> usize {
    TOTAL_RE
        .captures(output)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn tail(output: &str) -> String {
    let count = output.chars().count();
    output.chars().skip(count.saturating_sub(ERROR_EXCERPT_CHARS)).collect()
}
