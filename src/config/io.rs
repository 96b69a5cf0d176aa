//! Loading `reviewgate.toml` and the check catalog from disk.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::catalog::Catalog;
use super::types::ReviewConfig;
use crate::error::{ReviewError, Result};

pub const CONFIG_FILE: &str = "reviewgate.toml";

/// Reads `reviewgate.toml` under `root`. A missing file yields defaults.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_config(root: &Path) -> Result<ReviewConfig> {
    let path = root.join(CONFIG_FILE);
    Ok(read_optional_toml(&path)?.unwrap_or_default())
}

/// Parses configuration text. Used by tests and by [`load_config`].
///
/// # Errors
/// Returns error if the text is not valid configuration TOML.
pub fn parse_config(content: &str) -> Result<ReviewConfig> {
    parse_toml(content, Path::new(CONFIG_FILE))
}

/// Reads the check catalog at `path`. A missing file yields the built-in catalog.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    match read_optional_toml::<super::catalog::RawCatalog>(path)? {
        Some(raw) => Ok(Catalog::from_raw(raw)),
        None => {
            debug!(path = %path.display(), "no catalog file, using built-in catalog");
            Ok(Catalog::builtin())
        }
    }
}

fn read_optional_toml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| ReviewError::io(e, path))?;
    parse_toml(&content, path).map(Some)
}

fn parse_toml<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    toml::from_str(content).map_err(|source| ReviewError::Toml {
        source,
        path: path.to_path_buf(),
    })
}
