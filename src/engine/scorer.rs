// src/engine/scorer.rs
//! Priority scoring and the filters applied before reporting.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{Area, BlastRadius, Confidence, Finding, Severity};

#[must_use]
pub fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Blocker => 100.0,
        Severity::Recommendation => 50.0,
        Severity::Info => 10.0,
    }
}

#[must_use]
pub fn confidence_multiplier(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::High => 1.0,
        Confidence::Medium => 0.7,
        Confidence::Low => 0.4,
    }
}

#[must_use]
pub fn blast_radius_weight(radius: BlastRadius) -> f64 {
    match radius {
        BlastRadius::App => 4.0,
        BlastRadius::Package => 3.0,
        BlastRadius::Module => 2.0,
        BlastRadius::Local => 1.0,
    }
}

/// `severity * confidence * blast radius`.
#[must_use]
pub fn score(finding: &Finding) -> f64 {
    severity_weight(finding.severity)
        * confidence_multiplier(finding.confidence)
        * blast_radius_weight(finding.blast_radius)
}

/// Sorts by descending score. Ties keep their input order.
#[must_use]
pub fn prioritize(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by(|a, b| descending(score(a), score(b)));
    findings
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Keeps findings at or above `min`.
#[must_use]
pub fn filter_by_confidence(findings: Vec<Finding>, min: Confidence) -> Vec<Finding> {
    findings.into_iter().filter(|f| f.confidence >= min).collect()
}

/// Keeps findings in `areas`; an empty list keeps everything.
#[must_use]
pub fn filter_by_area(findings: Vec<Finding>, areas: &[Area]) -> Vec<Finding> {
    if areas.is_empty() {
        return findings;
    }
    findings.into_iter().filter(|f| areas.contains(&f.area)).collect()
}

/// Findings split by severity, each group in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeverityGroups {
    pub blockers: Vec<Finding>,
    pub recommendations: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl SeverityGroups {
    #[must_use]
    pub fn len(&self) -> usize {
        self.blockers.len() + self.recommendations.len() + self.info.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use]
pub fn group_by_severity(findings: Vec<Finding>) -> SeverityGroups {
    let mut groups = SeverityGroups::default();
    for finding in findings {
        match finding.severity {
            Severity::Blocker => groups.blockers.push(finding),
            Severity::Recommendation => groups.recommendations.push(finding),
            Severity::Info => groups.info.push(finding),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Automatable, Evidence};

    fn finding(id: &str, severity: Severity, confidence: Confidence, blast: BlastRadius) -> Finding {
        Finding {
            id: id.to_string(),
            area: Area::Complex,
            severity,
            confidence,
            checklist_ref: "C-COMPLEX-01".to_string(),
            title: String::new(),
            status: "OPEN",
            evidence: Evidence::default(),
            impact: Vec::new(),
            blast_radius: blast,
            risk_if_merge: String::new(),
            proposed_fix: Vec::new(),
            acceptance_criteria: String::new(),
            automatable: Automatable::No,
            hard_gate_candidate: None,
        }
    }

    fn ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn score_multiplies_the_three_weights() {
        let f = finding("a", Severity::Blocker, Confidence::High, BlastRadius::Package);
        assert!((score(&f) - 300.0).abs() < 1e-9);
        let f = finding("b", Severity::Recommendation, Confidence::Medium, BlastRadius::Local);
        assert!((score(&f) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn prioritize_is_descending_and_stable() {
        let findings = vec![
            finding("low", Severity::Info, Confidence::Low, BlastRadius::Local),
            finding("tie-1", Severity::Recommendation, Confidence::High, BlastRadius::Module),
            finding("top", Severity::Blocker, Confidence::High, BlastRadius::App),
            finding("tie-2", Severity::Recommendation, Confidence::High, BlastRadius::Module),
        ];
        assert_eq!(ids(&prioritize(findings)), vec!["top", "tie-1", "tie-2", "low"]);
    }

    #[test]
    fn confidence_filter_is_inclusive() {
        let findings = vec![
            finding("h", Severity::Info, Confidence::High, BlastRadius::Local),
            finding("m", Severity::Info, Confidence::Medium, BlastRadius::Local),
            finding("l", Severity::Info, Confidence::Low, BlastRadius::Local),
        ];
        assert_eq!(ids(&filter_by_confidence(findings, Confidence::Medium)), vec!["h", "m"]);
    }

    #[test]
    fn area_filter_empty_keeps_all() {
        let findings = vec![finding("a", Severity::Info, Confidence::Low, BlastRadius::Local)];
        assert_eq!(filter_by_area(findings.clone(), &[]).len(), 1);
        assert!(filter_by_area(findings, &[Area::Dep]).is_empty());
    }

    #[test]
    fn groups_preserve_order() {
        let findings = vec![
            finding("r1", Severity::Recommendation, Confidence::Low, BlastRadius::Local),
            finding("b1", Severity::Blocker, Confidence::Low, BlastRadius::Local),
            finding("r2", Severity::Recommendation, Confidence::Low, BlastRadius::Local),
        ];
        let groups = group_by_severity(findings);
        assert_eq!(ids(&groups.blockers), vec!["b1"]);
        assert_eq!(ids(&groups.recommendations), vec!["r1", "r2"]);
        assert_eq!(groups.len(), 3);
    }
}
