// Configuration file loading

use crate::assistant::{prompt::DEFAULT_MODEL, GEMINI_API_BASE};
use crate::models::ScenarioId;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// InfraInsight configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    #[serde(
        rename = "corsOrigins",
        alias = "cors_origins",
        default
    )]
    pub cors_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3420
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Hosted model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(rename = "apiBaseUrl", alias = "api_base_url", default = "default_api_base_url")]
    pub api_base_url: String,
    /// Environment variable holding the API key
    #[serde(rename = "apiKeyEnv", alias = "api_key_env", default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_api_base_url() -> String {
    GEMINI_API_BASE.to_string()
}
fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    #[serde(rename = "defaultScenario", alias = "default_scenario", default)]
    pub default_scenario: ScenarioId,
    /// Fixed seed for the synthetic series; random on every start when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Default config path (~/.infra-insight/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        super::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load config from a specific path, falling back to defaults when absent
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the given path, or the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => match Self::default_path() {
                Some(p) => Self::load_from_path(&p),
                None => Ok(Self::default()),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be non-zero"));
        }
        if self.assistant.model.trim().is_empty() {
            return Err(anyhow!("assistant.model must not be empty"));
        }
        if self.assistant.api_key_env.trim().is_empty() {
            return Err(anyhow!("assistant.apiKeyEnv must not be empty"));
        }
        Ok(())
    }
}
