//! Command execution with a deadline and file-backed output capture.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::ReviewError;
use crate::types::TestOutcome;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs `cmd_str` in `repo_root`, killing it once `timeout` elapses.
///
/// Uses POSIX shell-style quoting rules via `shell_words::split`. Stdout and
/// stderr share one anonymous temporary file, so no reader threads are needed.
#[must_use]
pub fn run_with_timeout(repo_root: &Path, cmd_str: &str, timeout: Duration) -> TestOutcome {
    let start = Instant::now();

    let parts = match shell_words::split(cmd_str) {
        Ok(p) => p,
        Err(e) => {
            let err = ReviewError::InvalidCommand { command: cmd_str.to_string(), reason: e.to_string() };
            return TestOutcome::not_started(cmd_str, &err.to_string());
        }
    };

    let Some((program, args)) = parts.split_first() else {
        let err = ReviewError::InvalidCommand { command: cmd_str.to_string(), reason: "Empty command".to_string() };
        return TestOutcome::not_started(cmd_str, &err.to_string());
    };

    let mut capture = match tempfile::tempfile() {
        Ok(f) => f,
        Err(e) => return TestOutcome::not_started(cmd_str, &ReviewError::io(e, repo_root).to_string()),
    };

    let child = stdio_pair(&capture).and_then(|(out, err)| {
        Command::new(program)
            .args(args)
            .current_dir(repo_root)
            .stdin(Stdio::null())
            .stdout(out)
            .stderr(err)
            .spawn()
    });
    let mut child = match child {
        Ok(c) => c,
        Err(source) => {
            let err = ReviewError::Spawn { command: cmd_str.to_string(), source };
            return TestOutcome::not_started(cmd_str, &err.to_string());
        }
    };

    let waited = wait_with_deadline(&mut child, timeout);
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match waited {
        Ok((_, true)) => {
            warn!(command = %cmd_str, timeout_secs = timeout.as_secs(), "test run timed out");
            TestOutcome::timed_out(cmd_str, duration_ms)
        }
        Ok((status, false)) => {
            let output = read_capture(&mut capture).unwrap_or_default();
            let outcome = TestOutcome::finished(cmd_str, status.code(), &output, duration_ms);
            info!(passed = outcome.passed(), failed = outcome.failed_tests(), "test run finished");
            outcome
        }
        Err(e) => TestOutcome::not_started(cmd_str, &format!("Failed to wait for command: {e}")),
    }
}

fn stdio_pair(capture: &File) -> io::Result<(Stdio, Stdio)> {
    Ok((Stdio::from(capture.try_clone()?), Stdio::from(capture.try_clone()?)))
}

/// Polls until exit or deadline. The flag is `true` when the child was killed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<(ExitStatus, bool)> {
    let deadline = Instant::now().checked_add(timeout);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            let _ = child.kill();
            let status = child.wait()?;
            return Ok((status, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn read_capture(capture: &mut File) -> io::Result<String> {
    capture.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    capture.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
