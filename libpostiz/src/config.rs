//! Configuration management for Postiz tools

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::settings::{AuthScheme, Settings};
use crate::tools::ToolSpec;

pub const DEFAULT_BASE_URL: &str = "https://postiz.example.com/api";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub tools: ToolsConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub auth_scheme: AuthScheme,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            auth_scheme: AuthScheme::Raw,
        }
    }
}

// The key must never reach logs through `{:?}`.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("auth_scheme", &self.auth_scheme)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Directory holding the tool source files
    pub source_dir: String,
    /// `KEY=VALUE` file handed to the upload and attach processes
    pub env_file: String,
    pub upload_script: String,
    pub attach_script: String,
    pub interpreter: String,
    /// HTTP endpoint of the in-process upload capability. When unset only
    /// the external upload script is used.
    pub upload_endpoint: Option<String>,
    /// Env-file key holding the bearer token for `upload_endpoint`
    pub upload_token_var: String,
    pub debug_level: String,
    pub agent_id_var: String,
    pub required_vars: Vec<String>,
    /// Overrides the built-in tool list
    pub entries: Option<Vec<ToolSpec>>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            source_dir: ".".to_string(),
            env_file: "../.env".to_string(),
            upload_script: "../bookstack modification tools/upload_tool_1A.py".to_string(),
            attach_script: "../bookstack modification tools/attach_tool_1A.py".to_string(),
            interpreter: "python3".to_string(),
            upload_endpoint: None,
            upload_token_var: "BOOKSTACK_PASSWORD".to_string(),
            debug_level: "INFO".to_string(),
            agent_id_var: "BOOKSTACK_AGENT_ID".to_string(),
            required_vars: vec![
                "BOOKSTACK_BASE_URL".to_string(),
                "BOOKSTACK_PASSWORD".to_string(),
                "BOOKSTACK_AGENT_ID".to_string(),
            ],
            entries: None,
        }
    }
}

impl ToolsConfig {
    pub fn source_dir(&self) -> PathBuf {
        expand_path(&self.source_dir)
    }

    pub fn env_file(&self) -> PathBuf {
        expand_path(&self.env_file)
    }

    pub fn upload_script(&self) -> PathBuf {
        expand_path(&self.upload_script)
    }

    pub fn attach_script(&self) -> PathBuf {
        expand_path(&self.attach_script)
    }

    /// The configured tool list, or the built-in five
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.entries
            .clone()
            .unwrap_or_else(crate::tools::default_tools)
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults. `POSTIZ_API_URL` and
    /// `POSTIZ_API_KEY` override the file in both cases.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("POSTIZ_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(key) = std::env::var("POSTIZ_API_KEY") {
            if !key.trim().is_empty() {
                self.api.api_key = Some(key);
            }
        }
    }

    /// Build the settings used by authenticated requests
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when no API key is configured.
    pub fn settings(&self) -> Result<Settings> {
        let key = self
            .api
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingField("api.api_key (or POSTIZ_API_KEY)".to_string())
            })?;
        Ok(Settings::new(&self.api.base_url, key))
    }

    /// Settings for unauthenticated requests (login)
    pub fn anonymous_settings(&self) -> Settings {
        Settings::new(&self.api.base_url, self.api.api_key.as_deref().unwrap_or_default())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("POSTIZ_CONFIG") {
        return Ok(expand_path(&path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("postiz").join("config.toml"))
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
