// src/scan/mod.rs
//! Lexical scanners run over the changed files.
//!
//! Every scanner sits behind [`FileScanner`] so callers never depend on how
//! the text is inspected.

pub mod api_surface;
pub mod complexity;
pub mod side_effects;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::layers::Layer;

pub use api_surface::{ApiSurface, ExportInfo};
pub use complexity::{ComplexityIssue, ComplexityKind, ComplexityScanner};
pub use side_effects::{EffectCategory, SideEffectScanner, SideEffectViolation};

/// How serious a scanner hit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanSeverity {
    Medium,
    High,
}

impl ScanSeverity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// A per-file text scanner.
pub trait FileScanner {
    type Issue;

    /// Scans already-loaded content.
    fn scan_content(&self, path: &str, content: &str, layer: Layer) -> Vec<Self::Issue>;

    /// Reads `root/path` and scans it. Unreadable files yield nothing.
    fn scan(&self, root: &Path, path: &str, layer: Layer) -> Vec<Self::Issue> {
        match fs::read_to_string(root.join(path)) {
            Ok(content) => self.scan_content(path, &content, layer),
            Err(e) => {
                debug!(file = %path, error = %e, "scanner skipped unreadable file");
                Vec::new()
            }
        }
    }
}
