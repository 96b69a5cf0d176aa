// src/layers.rs
//! Path-based architectural layer classification.
//!
//! A file's layer is decided by the first matching path fragment in
//! [`LAYER_PATTERNS`]. [`is_valid_dependency`] is the only place that decides
//! whether an import between two layers is legal.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{normalize_path, Confidence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Presentation,
    Application,
    Domain,
    Infra,
    Shared,
    Types,
    Tests,
}

impl Layer {
    pub const ALL: [Self; 7] = [
        Self::Presentation,
        Self::Application,
        Self::Domain,
        Self::Infra,
        Self::Shared,
        Self::Types,
        Self::Tests,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Application => "application",
            Self::Domain => "domain",
            Self::Infra => "infra",
            Self::Shared => "shared",
            Self::Types => "types",
            Self::Tests => "tests",
        }
    }

    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let wanted = text.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| l.name() == wanted)
    }

    /// Layers whose code must stay free of side effects.
    #[must_use]
    pub fn is_pure(self) -> bool {
        matches!(self, Self::Domain | Self::Application)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Path fragments per layer, tested in this order.
pub const LAYER_PATTERNS: &[(Layer, &[&str])] = &[
    (
        Layer::Presentation,
        &["presentation/", "components/", "pages/", "views/", "ui/", "hooks/use"],
    ),
    (
        Layer::Application,
        &["application/", "services/", "use-cases/", "usecases/", "orchestration/"],
    ),
    (Layer::Domain, &["domain/", "models/", "entities/", "business/"]),
    (
        Layer::Infra,
        &["infra/", "infrastructure/", "adapters/", "repositories/", "api/client", "api/fetch"],
    ),
    (Layer::Shared, &["shared/", "utils/", "helpers/", "common/", "lib/"]),
    (Layer::Types, &["types/", ".d.ts", "interfaces/"]),
    (Layer::Tests, &["tests/", "test/", "__tests__/", ".test.", ".spec."]),
];

/// A file's layer with how sure the classifier is about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerInfo {
    pub layer: Layer,
    pub confidence: Confidence,
    pub reason: String,
}

/// Classifies a path. Unmatched paths default to `shared` with LOW confidence.
#[must_use]
pub fn classify(path: &str) -> LayerInfo {
    let normalized = normalize_path(path).to_lowercase();

    for (layer, patterns) in LAYER_PATTERNS {
        if let Some(pattern) = patterns.iter().find(|p| normalized.contains(**p)) {
            return LayerInfo {
                layer: *layer,
                confidence: Confidence::High,
                reason: format!("Path contains '{pattern}'"),
            };
        }
    }

    LayerInfo {
        layer: Layer::Shared,
        confidence: Confidence::Low,
        reason: "No clear layer indicators in path".to_string(),
    }
}

/// Classifies every path, keyed by the path as given.
#[must_use]
pub fn classify_batch<S: AsRef<str>>(paths: &[S]) -> BTreeMap<String, LayerInfo> {
    paths
        .iter()
        .map(|p| (p.as_ref().to_string(), classify(p.as_ref())))
        .collect()
}

/// Whether code in `from` may import code in `to`.
#[must_use]
pub fn is_valid_dependency(from: Layer, to: Layer) -> bool {
    use Layer::{Application, Domain, Infra, Presentation, Shared, Tests, Types};

    if matches!(to, Shared | Types) || from == Tests {
        return true;
    }
    match from {
        Infra | Domain => matches!(to, Domain),
        Application => matches!(to, Domain | Application | Infra),
        Presentation => to != Tests,
        Shared | Types | Tests => true,
    }
}
