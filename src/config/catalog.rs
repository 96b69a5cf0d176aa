//! Check catalog: the reasoning table and the domain checks.

use serde::{Deserialize, Serialize};

use crate::types::{Automatable, Severity};

/// Maps a textual condition to the domains it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningRule {
    pub condition: String,
    pub domains: Vec<String>,
}

/// A review check belonging to one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub id: String,
    pub domain: String,
    pub title: String,
    pub severity: Severity,
    pub description: String,
    pub evidence_requirements: String,
    pub automatable: Automatable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    reasoning: Vec<ReasoningRule>,
    checks: Vec<Check>,
}

impl Catalog {
    #[must_use]
    pub fn new(reasoning: Vec<ReasoningRule>, checks: Vec<Check>) -> Self {
        Self { reasoning, checks }
    }

    #[must_use]
    pub fn reasoning(&self) -> &[ReasoningRule] {
        &self.reasoning
    }

    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Checks of one domain, in catalog order.
    pub fn checks_for<'a>(&'a self, domain: &'a str) -> impl Iterator<Item = &'a Check> + 'a {
        self.checks.iter().filter(move |c| c.domain == domain)
    }

    pub(crate) fn from_raw(raw: RawCatalog) -> Self {
        let reasoning = raw
            .reasoning
            .into_iter()
            .map(|r| ReasoningRule {
                condition: r.condition,
                domains: r.domains.into_vec(),
            })
            .collect();
        let checks = raw.checks.into_iter().map(RawCheck::into_check).collect();
        Self { reasoning, checks }
    }

    /// Catalog used when no catalog file is present.
    #[must_use]
    pub fn builtin() -> Self {
        let reasoning = BUILTIN_REASONING
            .iter()
            .map(|(condition, domain)| ReasoningRule {
                condition: (*condition).to_string(),
                domains: vec![(*domain).to_string()],
            })
            .collect();
        let checks = BUILTIN_CHECKS
            .iter()
            .map(|(id, domain, title, severity, automatable)| Check {
                id: (*id).to_string(),
                domain: (*domain).to_string(),
                title: (*title).to_string(),
                severity: *severity,
                description: (*title).to_string(),
                evidence_requirements: String::new(),
                automatable: *automatable,
            })
            .collect();
        Self { reasoning, checks }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_REASONING: &[(&str, &str)] = &[
    ("layer_classification", "layer"),
    ("circular_dependency", "dependencies"),
    ("side_effect_violation", "purity"),
    ("complexity_issue", "complexity"),
    ("deep_index_files", "api"),
    ("api_breaking_change", "api"),
    ("default_export_overuse", "api"),
    ("test_failure", "testing"),
];

type BuiltinCheck = (&'static str, &'static str, &'static str, Severity, Automatable);

const BUILTIN_CHECKS: &[BuiltinCheck] = &[
    ("C-LAYER-01", "layer", "Imports respect layer direction", Severity::Blocker, Automatable::Partial),
    ("C-DEP-01", "dependencies", "No circular dependencies", Severity::Blocker, Automatable::Yes),
    ("C-PURE-01", "purity", "Pure layers stay free of side effects", Severity::Recommendation, Automatable::Partial),
    ("C-COMPLEX-01", "complexity", "Functions stay small and shallow", Severity::Recommendation, Automatable::No),
    ("C-API-01", "api", "Public surface stays stable", Severity::Recommendation, Automatable::Partial),
    ("C-TEST-01", "testing", "Test suite passes", Severity::Blocker, Automatable::No),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawCatalog {
    reasoning: Vec<RawReasoning>,
    checks: Vec<RawCheck>,
}

#[derive(Debug, Deserialize)]
struct RawReasoning {
    #[serde(default)]
    condition: String,
    #[serde(default)]
    domains: DomainList,
}

/// `domains = "a, b"` or `domains = ["a", "b"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DomainList {
    Joined(String),
    List(Vec<String>),
}

impl Default for DomainList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl DomainList {
    fn into_vec(self) -> Vec<String> {
        let items = match self {
            Self::Joined(s) => s.split(',').map(str::to_string).collect(),
            Self::List(v) => v,
        };
        items
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawCheck {
    id: String,
    domain: String,
    #[serde(default)]
    title: String,
    #[serde(default = "default_severity")]
    severity: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    evidence_requirements: String,
    #[serde(default = "default_automatable")]
    automatable: String,
}

fn default_severity() -> String {
    "RECOMMENDATION".to_string()
}

fn default_automatable() -> String {
    "NO".to_string()
}

impl RawCheck {
    fn into_check(self) -> Check {
        Check {
            id: self.id,
            domain: self.domain,
            title: self.title,
            severity: Severity::parse(&self.severity),
            description: self.description,
            evidence_requirements: self.evidence_requirements,
            automatable: Automatable::parse(&self.automatable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Catalog {
        let raw: RawCatalog = toml::from_str(text).unwrap_or_else(|e| panic!("bad toml: {e}"));
        Catalog::from_raw(raw)
    }

    #[test]
    fn domains_accept_joined_and_list_forms() {
        let catalog = parse(
            r#"
[[reasoning]]
condition = "circular"
domains = "dependencies, layer,"

[[reasoning]]
condition = "fetch"
domains = ["purity"]
"#,
        );
        assert_eq!(catalog.reasoning()[0].domains, vec!["dependencies", "layer"]);
        assert_eq!(catalog.reasoning()[1].domains, vec!["purity"]);
    }

    #[test]
    fn check_tags_parse_leniently() {
        let catalog = parse(
            r#"
[[checks]]
id = "C-X-01"
domain = "x"
severity = "blocker"
automatable = "maybe"
"#,
        );
        let check = &catalog.checks()[0];
        assert_eq!(check.severity, Severity::Blocker);
        assert_eq!(check.automatable, Automatable::No);
    }

    #[test]
    fn builtin_covers_every_reasoned_domain() {
        let catalog = Catalog::builtin();
        for rule in catalog.reasoning() {
            for domain in &rule.domains {
                assert!(catalog.checks_for(domain).next().is_some(), "no checks for {domain}");
            }
        }
    }
}
