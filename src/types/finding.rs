//! Findings and fix results.

use serde::Serialize;

use super::{Area, Automatable, BlastRadius, Confidence, Severity};

/// Quality attribute a finding threatens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Impact {
    Arch,
    Maintainability,
    Testability,
}

/// A file implicated by a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceFile {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diff_hunks: Vec<String>,
}

impl EvidenceFile {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self { path: path.to_string(), diff_hunks: Vec::new() }
    }
}

/// Dependency chain backing a LAYER or DEP finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyTrace {
    /// Importer first, then imported file(s).
    pub chain: Vec<String>,
    pub direction_violation: bool,
    /// Total number of cycles detected, for DEP findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_count: Option<usize>,
}

/// Evidence attached to a finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub files: Vec<EvidenceFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_trace: Option<DependencyTrace>,
}

impl Evidence {
    /// Evidence naming the given files, without a trace.
    #[must_use]
    pub fn files<S: AsRef<str>>(paths: &[S]) -> Self {
        Self {
            files: paths.iter().map(|p| EvidenceFile::new(p.as_ref())).collect(),
            dependency_trace: None,
        }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: DependencyTrace) -> Self {
        self.dependency_trace = Some(trace);
        self
    }

    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    /// The dependency chain, or an empty slice.
    #[must_use]
    pub fn chain(&self) -> &[String] {
        self.dependency_trace.as_ref().map_or(&[], |t| t.chain.as_slice())
    }
}

/// Template for codifying a finding as an always-on static rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardGateCandidate {
    pub rule_idea: String,
    pub implementation_hint: String,
    pub false_positive_risk: Confidence,
    pub scope: String,
}

/// A review finding. Self-describing: reporting needs no further lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub id: String,
    pub area: Area,
    pub severity: Severity,
    pub confidence: Confidence,
    pub checklist_ref: String,
    pub title: String,
    pub status: &'static str,
    pub evidence: Evidence,
    pub impact: Vec<Impact>,
    pub blast_radius: BlastRadius,
    pub risk_if_merge: String,
    pub proposed_fix: Vec<String>,
    pub acceptance_criteria: String,
    pub automatable: Automatable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_gate_candidate: Option<HardGateCandidate>,
}

impl Finding {
    #[must_use]
    pub fn is_blocker(&self) -> bool {
        self.severity == Severity::Blocker
    }

    /// Whether the finding is a template for a static rule.
    #[must_use]
    pub fn is_hard_gate_candidate(&self) -> bool {
        matches!(self.automatable, Automatable::Yes | Automatable::Partial)
    }
}

/// Outcome of attempting an automatic fix for one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixResult {
    pub finding_id: String,
    pub success: bool,
    pub files_modified: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FixResult {
    #[must_use]
    pub fn success(finding_id: &str, files_modified: Vec<String>) -> Self {
        Self { finding_id: finding_id.to_string(), success: true, files_modified, error: None }
    }

    #[must_use]
    pub fn failure(finding_id: &str, error: impl Into<String>) -> Self {
        Self {
            finding_id: finding_id.to_string(),
            success: false,
            files_modified: Vec::new(),
            error: Some(error.into()),
        }
    }
}
