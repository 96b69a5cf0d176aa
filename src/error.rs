// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("Failed to parse command `{command}`: {reason}")]
    InvalidCommand { command: String, reason: String },

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Not inside a Git repository")]
    NotInGitRepo,
}

pub type Result<T> = std::result::Result<T, ReviewError>;

impl ReviewError {
    /// Wraps an I/O error with the path it concerns.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io { source, path: path.into() }
    }
}

// Allow `?` on std::io::Error by converting to ReviewError::Io with unknown path.
impl From<std::io::Error> for ReviewError {
    fn from(source: std::io::Error) -> Self {
        ReviewError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
