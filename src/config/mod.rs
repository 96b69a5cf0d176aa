// src/config/mod.rs
pub mod catalog;
pub mod io;
pub mod overrides;
pub mod types;

pub use self::catalog::{Catalog, Check, ReasoningRule};
pub use self::io::{load_catalog, load_config, parse_config, CONFIG_FILE};
pub use self::overrides::{OverrideStore, ResolvedOverrides};
pub use self::types::{
    GraphConfig, ResolverConfig, ReviewConfig, ReviewSettings, ScanThresholds, TestsConfig,
};

use std::path::Path;
use tracing::warn;

impl ReviewConfig {
    /// Loads `reviewgate.toml`, falling back to defaults when it cannot be parsed.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        load_config(root).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring configuration, using defaults");
            Self::default()
        })
    }

    /// Absolute catalog path for a repository root.
    #[must_use]
    pub fn catalog_path(&self, root: &Path) -> std::path::PathBuf {
        root.join(&self.review.catalog)
    }

    #[must_use]
    pub fn override_store(&self, root: &Path) -> OverrideStore {
        OverrideStore::new(root.join(&self.review.review_system_dir))
    }
}
