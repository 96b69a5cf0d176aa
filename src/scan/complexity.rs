//! Coarse complexity heuristics: deep nesting, long functions, god files.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::{FileScanner, ScanSeverity};
use crate::config::ScanThresholds;
use crate::layers::Layer;

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(function|const|let|var)\s+(\w+)\s*[=(]")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

static IF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bif\s*\(").unwrap_or_else(|_| panic!("Invalid Regex")));

static LOOP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(for|while)\s*\(").unwrap_or_else(|_| panic!("Invalid Regex"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityKind {
    DeepNesting,
    LongFunction,
    GodFunction,
}

impl ComplexityKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DeepNesting => "deep_nesting",
            Self::LongFunction => "long_function",
            Self::GodFunction => "god_function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityIssue {
    pub file: String,
    pub line: usize,
    pub kind: ComplexityKind,
    pub severity: ScanSeverity,
    pub details: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityScanner {
    thresholds: ScanThresholds,
}

impl ComplexityScanner {
    #[must_use]
    pub fn new(thresholds: ScanThresholds) -> Self {
        Self { thresholds }
    }

    fn nesting(&self, path: &str, content: &str) -> Vec<ComplexityIssue> {
        content
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                let indent = line.chars().take_while(|c| c.is_whitespace()).count();
                (indent > self.thresholds.max_indent_columns).then(|| ComplexityIssue {
                    file: path.to_string(),
                    line: idx + 1,
                    kind: ComplexityKind::DeepNesting,
                    severity: ScanSeverity::Medium,
                    details: format!("Nesting depth: {} levels", indent / 2),
                })
            })
            .collect()
    }

    /// Only the gap between two consecutive markers is measured; the last
    /// function in a file is never reported.
    fn function_length(&self, path: &str, content: &str) -> Vec<ComplexityIssue> {
        let mut issues = Vec::new();
        let mut current: Option<(&str, usize)> = None;

        for (idx, line) in content.lines().enumerate() {
            let Some(caps) = FUNCTION_RE.captures(line) else { continue };
            let line_no = idx + 1;
            if let Some((name, start)) = current {
                let length = line_no - start;
                if length > self.thresholds.max_function_lines {
                    issues.push(ComplexityIssue {
                        file: path.to_string(),
                        line: start,
                        kind: ComplexityKind::LongFunction,
                        severity: ScanSeverity::Medium,
                        details: format!("Function '{name}' is {length} lines"),
                    });
                }
            }
            current = caps.get(2).map(|m| (m.as_str(), line_no));
        }
        issues
    }

    fn god_function(&self, path: &str, content: &str) -> Option<ComplexityIssue> {
        let ifs = IF_RE.find_iter(content).count();
        let loops = LOOP_RE.find_iter(content).count();
        let crowded = ifs > self.thresholds.max_conditionals || loops > self.thresholds.max_loops;
        crowded.then(|| ComplexityIssue {
            file: path.to_string(),
            line: 1,
            kind: ComplexityKind::GodFunction,
            severity: ScanSeverity::High,
            details: format!("High branching: {ifs} ifs, {loops} loops"),
        })
    }
}

impl FileScanner for ComplexityScanner {
    type Issue = ComplexityIssue;

    fn scan_content(&self, path: &str, content: &str, _layer: Layer) -> Vec<ComplexityIssue> {
        let mut issues = self.nesting(path, content);
        issues.extend(self.function_length(path, content));
        issues.extend(self.god_function(path, content));
        issues
    }
}
