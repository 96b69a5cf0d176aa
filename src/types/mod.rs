use serde::{Deserialize, Serialize};
use std::fmt;

mod changeset;
mod command;
mod finding;
pub use changeset::{ChangeStatus, ChangedFile, Changeset};
pub use command::TestOutcome;
pub use finding::{
    DependencyTrace, Evidence, EvidenceFile, Finding, FixResult, HardGateCandidate, Impact,
};

/// Confidence level attached to layer classifications and findings.
///
/// Ordered `Low < Medium < High` so thresholds can be compared directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Lenient parse. Unknown text falls back to the lowest tier.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How urgently a finding must be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Blocker,
    Recommendation,
    Info,
}

impl Severity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Blocker => "BLOCKER",
            Self::Recommendation => "RECOMMENDATION",
            Self::Info => "INFO",
        }
    }

    /// Lenient parse. Unknown text falls back to the lowest tier.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "BLOCKER" => Self::Blocker,
            "RECOMMENDATION" => Self::Recommendation,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a finding (or check) can be remediated mechanically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Automatable {
    Yes,
    Partial,
    No,
}

impl Automatable {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::Partial => "PARTIAL",
            Self::No => "NO",
        }
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "YES" => Self::Yes,
            "PARTIAL" => Self::Partial,
            _ => Self::No,
        }
    }
}

/// Declared scope of impact, used as a scoring multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlastRadius {
    Local,
    Module,
    Package,
    App,
}

impl BlastRadius {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Module => "MODULE",
            Self::Package => "PACKAGE",
            Self::App => "APP",
        }
    }

    /// Lenient parse. Unknown text falls back to the lowest tier.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "APP" => Self::App,
            "PACKAGE" => Self::Package,
            "MODULE" => Self::Module,
            _ => Self::Local,
        }
    }
}

/// Review area a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Area {
    Layer,
    Dep,
    Pure,
    Complex,
    Api,
}

impl Area {
    pub const ALL: [Self; 5] = [Self::Layer, Self::Dep, Self::Pure, Self::Complex, Self::Api];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Layer => "LAYER",
            Self::Dep => "DEP",
            Self::Pure => "PURE",
            Self::Complex => "COMPLEX",
            Self::Api => "API",
        }
    }

    /// Case-insensitive lookup by label (`"dep"`, `"LAYER"`, ...).
    #[must_use]
    pub fn from_label(text: &str) -> Option<Self> {
        let wanted = text.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|a| a.label() == wanted)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalizes a path string to forward slashes without a leading `./`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let trimmed = unified.strip_prefix("./").unwrap_or(&unified);
    trimmed.to_string()
}
