//! `KEY=VALUE` environment files
//!
//! One assignment per line, `#` starts a comment line, the first `=` splits
//! key from value. Values are taken verbatim (no quote handling).

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{ConfigError, Result};

pub type EnvMap = BTreeMap<String, String>;

pub fn parse_env(content: &str) -> EnvMap {
    let mut vars = EnvMap::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                vars.insert(key.to_string(), value.to_string());
            }
            None => warn!("Ignoring line {} without '=' in env file", index + 1),
        }
    }

    vars
}

/// Load an env file; a missing file yields an empty map and a warning
pub fn load_env_file(path: &Path) -> Result<EnvMap> {
    if !path.exists() {
        warn!(".env file not found at {}", path.display());
        return Ok(EnvMap::new());
    }

    info!("Loading environment variables from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    Ok(parse_env(&content))
}

/// Keys from `required` that the map does not define
pub fn missing_keys<'a>(vars: &EnvMap, required: &'a [String]) -> Vec<&'a str> {
    required
        .iter()
        .filter(|key| !vars.contains_key(key.as_str()))
        .map(String::as_str)
        .collect()
}
