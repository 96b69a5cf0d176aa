//! Side effects leaking into layers that should stay pure.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::{FileScanner, ScanSeverity};
use crate::layers::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectCategory {
    Network,
    Fs,
    Time,
    Random,
    Console,
    Dom,
}

impl EffectCategory {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Fs => "fs",
            Self::Time => "time",
            Self::Random => "random",
            Self::Console => "console",
            Self::Dom => "dom",
        }
    }

    #[must_use]
    pub fn severity(self) -> ScanSeverity {
        match self {
            Self::Network | Self::Fs => ScanSeverity::High,
            _ => ScanSeverity::Medium,
        }
    }
}

static PATTERNS: LazyLock<Vec<(EffectCategory, Regex)>> = LazyLock::new(|| {
    let table: &[(EffectCategory, &[&str])] = &[
        (
            EffectCategory::Network,
            &[r"\bfetch\s*\(", r"\baxios\.", r"\.get\s*\(", r"\.post\s*\("],
        ),
        (EffectCategory::Fs, &[r"\bfs\.", r"\.readFile", r"\.writeFile"]),
        (
            EffectCategory::Time,
            &[r"\bDate\.now\s*\(", r"\bnew\s+Date\s*\(", r"\bsetTimeout\s*\("],
        ),
        (EffectCategory::Random, &[r"\bMath\.random\s*\("]),
        (
            EffectCategory::Console,
            &[r"\bconsole\.(log|warn|error|info|debug)\s*\("],
        ),
        (
            EffectCategory::Dom,
            &[r"\bdocument\.", r"\bwindow\.", r"\blocalStorage\."],
        ),
    ];
    table
        .iter()
        .map(|(category, patterns)| {
            let joined = patterns.join("|");
            let re = Regex::new(&joined).unwrap_or_else(|_| panic!("Invalid Regex"));
            (*category, re)
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideEffectViolation {
    pub file: String,
    /// 1-based.
    pub line: usize,
    pub content: String,
    pub category: EffectCategory,
    pub severity: ScanSeverity,
}

/// Flags network, filesystem, clock, randomness, console and DOM access.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideEffectScanner;

impl FileScanner for SideEffectScanner {
    type Issue = SideEffectViolation;

    fn scan_content(&self, path: &str, content: &str, layer: Layer) -> Vec<SideEffectViolation> {
        if !layer.is_pure() {
            return Vec::new();
        }
        content
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                let (category, _) = PATTERNS.iter().find(|(_, re)| re.is_match(line))?;
                Some(SideEffectViolation {
                    file: path.to_string(),
                    line: idx + 1,
                    content: line.trim().to_string(),
                    category: *category,
                    severity: category.severity(),
                })
            })
            .collect()
    }
}
