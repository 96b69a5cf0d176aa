// src/exit.rs
//! Standardized process exit codes for `reviewgate`.
//!
//! Provides a stable contract for CI scripts.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ReviewExit {
    /// Review completed and no blocker remains.
    Success = 0,
    /// At least one BLOCKER finding remains after auto-fix.
    BlockersRemain = 1,
    /// Operational error (not a git repository, unreadable config, ...).
    Error = 2,
}

impl ReviewExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Exit status for a finished review.
    #[must_use]
    pub fn for_blockers(remaining: usize) -> Self {
        if remaining == 0 {
            Self::Success
        } else {
            Self::BlockersRemain
        }
    }
}

impl Termination for ReviewExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<ReviewExit>> for ReviewExit {
    fn from(res: anyhow::Result<ReviewExit>) -> Self {
        match res {
            Ok(exit) => exit,
            Err(e) => {
                eprintln!("Error: {e:#}");
                Self::Error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blockers_map_to_non_zero() {
        assert_eq!(ReviewExit::for_blockers(0).code(), 0);
        assert_eq!(ReviewExit::for_blockers(3).code(), 1);
    }

    #[test]
    fn errors_map_to_error_exit() {
        let exit: ReviewExit = Err(anyhow::anyhow!("boom")).into();
        assert_eq!(exit, ReviewExit::Error);
    }
}
