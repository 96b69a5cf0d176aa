// src/fix/marker.rs
//! Leading marker comment for files with side effects in a pure layer.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::writer::write_atomic;
use crate::lang;

const MARKER_TAG: &str = "TODO(review-gate): isolate side effects";
/// Lines searched for an existing marker.
const HEADER_WINDOW: usize = 5;

/// Inserts the marker into `path`, returning the modified file.
///
/// # Errors
/// Fails for files without a line-comment token, unreadable files, and files
/// that already carry the marker.
pub fn insert(root: &Path, path: &str, title: &str) -> Result<String> {
    let Some(prefix) = lang::comment_prefix(path) else {
        bail!("Unsupported file type for auto-fix: {path}");
    };

    let full = root.join(path);
    let content = fs::read_to_string(&full).with_context(|| format!("Failed to read {path}"))?;

    let Some(updated) = with_marker(&content, prefix, title) else {
        bail!("marker already present");
    };

    write_atomic(&full, &updated)?;
    Ok(path.to_string())
}

#[must_use]
pub fn marker_line(prefix: &str, title: &str) -> String {
    format!("{prefix} {MARKER_TAG} - {title}")
}

/// `content` with the marker after any shebang or encoding header.
/// `None` when the header window already contains a marker.
#[must_use]
pub fn with_marker(content: &str, prefix: &str, title: &str) -> Option<String> {
    if content.lines().take(HEADER_WINDOW).any(|l| l.contains(MARKER_TAG)) {
        return None;
    }

    let marker = marker_line(prefix, title);
    let mut lines: Vec<&str> = content.split('\n').collect();
    let at = header_len(&lines);
    lines.insert(at, &marker);
    Some(lines.join("\n"))
}

fn header_len(lines: &[&str]) -> usize {
    let mut at = 0;
    if lines.first().is_some_and(|l| l.starts_with("#!")) {
        at += 1;
    }
    if lines.get(at).is_some_and(|l| l.starts_with('#') && l.contains("coding")) {
        at += 1;
    }
    at
}
