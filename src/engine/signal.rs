// src/engine/signal.rs
//! Typed analyzer output fed to the router and the finding generator.

use serde::Serialize;

use crate::layers::LayerInfo;
use crate::scan::{ComplexityIssue, ExportInfo, SideEffectViolation};
use crate::types::Confidence;

/// One observation produced by an analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    LayerClassification {
        file: String,
        info: LayerInfo,
    },
    CircularDependency {
        cycles: usize,
    },
    SideEffectViolation {
        file: String,
        violations: Vec<SideEffectViolation>,
    },
    ComplexityIssue {
        file: String,
        issues: Vec<ComplexityIssue>,
    },
    DeepIndexFiles {
        files: Vec<String>,
    },
    ApiBreakingChange {
        changes: Vec<String>,
    },
    DefaultExportOveruse {
        exports: Vec<ExportInfo>,
    },
    TestFailure {
        failed: usize,
        files: Vec<String>,
    },
}

impl Signal {
    /// Stable kind name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LayerClassification { .. } => "layer_classification",
            Self::CircularDependency { .. } => "circular_dependency",
            Self::SideEffectViolation { .. } => "side_effect_violation",
            Self::ComplexityIssue { .. } => "complexity_issue",
            Self::DeepIndexFiles { .. } => "deep_index_files",
            Self::ApiBreakingChange { .. } => "api_breaking_change",
            Self::DefaultExportOveruse { .. } => "default_export_overuse",
            Self::TestFailure { .. } => "test_failure",
        }
    }

    /// Analyzer that produced the signal.
    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Self::LayerClassification { .. } => "layer_classifier",
            Self::CircularDependency { .. } => "graph_builder",
            Self::SideEffectViolation { .. } => "side_effect_scanner",
            Self::ComplexityIssue { .. } => "complexity_scanner",
            Self::DeepIndexFiles { .. }
            | Self::ApiBreakingChange { .. }
            | Self::DefaultExportOveruse { .. } => "api_surface_analyzer",
            Self::TestFailure { .. } => "test_runner",
        }
    }

    /// Confidence in `[0, 1]`.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self {
            Self::LayerClassification { info, .. } => {
                if info.confidence == Confidence::High {
                    0.9
                } else {
                    0.6
                }
            }
            Self::CircularDependency { .. } | Self::TestFailure { .. } => 1.0,
            Self::SideEffectViolation { .. } => 0.95,
            Self::ComplexityIssue { .. } => 0.8,
            Self::DeepIndexFiles { .. } => 0.85,
            Self::ApiBreakingChange { .. } => 0.9,
            Self::DefaultExportOveruse { .. } => 0.7,
        }
    }

    /// File the signal is about, when it concerns a single file.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::LayerClassification { file, .. }
            | Self::SideEffectViolation { file, .. }
            | Self::ComplexityIssue { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Flat text form used for condition matching: kind followed by payload.
    #[must_use]
    pub fn describe(&self) -> String {
        let payload = match self {
            Self::LayerClassification { file, info } => {
                format!("file={file} layer={} confidence={}", info.layer, info.confidence)
            }
            Self::CircularDependency { cycles } => format!("cycles={cycles}"),
            Self::SideEffectViolation { file, violations } => {
                let categories: Vec<&str> = violations.iter().map(|v| v.category.label()).collect();
                format!("file={file} violations={} categories={}", violations.len(), categories.join(","))
            }
            Self::ComplexityIssue { file, issues } => {
                let kinds: Vec<&str> = issues.iter().map(|i| i.kind.label()).collect();
                format!("file={file} issues={} kinds={}", issues.len(), kinds.join(","))
            }
            Self::DeepIndexFiles { files } => format!("files={}", files.join(",")),
            Self::ApiBreakingChange { changes } => format!("changes={}", changes.len()),
            Self::DefaultExportOveruse { exports } => {
                let files: Vec<&str> = exports.iter().map(|e| e.file.as_str()).collect();
                format!("exports={} files={}", exports.len(), files.join(","))
            }
            Self::TestFailure { failed, .. } => format!("failed={failed}"),
        };
        format!("{} {payload}", self.kind())
    }
}
