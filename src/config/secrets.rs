// Storage for API tokens
//
// Tokens live in ~/.infra-insight/secrets.toml (never next to config.toml
// in a project checkout). The environment always wins over this file.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Provider id the assistant's key is stored under
pub const GEMINI_PROVIDER: &str = "gemini";

/// Secrets stored in ~/.infra-insight/secrets.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// API tokens indexed by provider ID (e.g., "gemini" -> "AIza...")
    #[serde(default)]
    pub api_tokens: HashMap<String, String>,
}

impl SecretsConfig {
    /// Get the secrets file path (~/.infra-insight/secrets.toml)
    pub fn get_secrets_path() -> Option<PathBuf> {
        super::config_dir().map(|p| p.join("secrets.toml"))
    }

    /// Load secrets from the default location
    pub fn load() -> Result<Self> {
        let path = Self::get_secrets_path()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read secrets file '{}': {}", path.display(), e))?;

        let config: SecretsConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse secrets file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Get a provider's API token, ignoring blank entries
    pub fn get_token(&self, provider_id: &str) -> Option<&str> {
        self.api_tokens
            .get(provider_id)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
    }

    /// Check if a provider has a token configured
    pub fn has_token(&self, provider_id: &str) -> bool {
        self.get_token(provider_id).is_some()
    }
}

/// Resolve the assistant's API key: `env_var` first, then the stored token.
///
/// `None` means the credential is missing.
pub fn resolve_api_key(env_var: &str, secrets: &SecretsConfig) -> Option<String> {
    pick_api_key(std::env::var(env_var).ok(), secrets)
}

fn pick_api_key(env_value: Option<String>, secrets: &SecretsConfig) -> Option<String> {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| secrets.get_token(GEMINI_PROVIDER).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_token(token: &str) -> SecretsConfig {
        let mut config = SecretsConfig::default();
        config
            .api_tokens
            .insert(GEMINI_PROVIDER.to_string(), token.to_string());
        config
    }

    #[test]
    fn test_secrets_config_default() {
        let config = SecretsConfig::default();
        assert!(config.api_tokens.is_empty());
        assert!(!config.has_token(GEMINI_PROVIDER));
    }

    #[test]
    fn test_blank_token_is_missing() {
        let config = with_token("   ");
        assert!(config.get_token(GEMINI_PROVIDER).is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[api_tokens]\ngemini = \"sk-12345\"\n").unwrap();

        let config = SecretsConfig::load_from_path(&path).unwrap();
        assert_eq!(config.get_token("gemini"), Some("sk-12345"));
        assert!(!config.has_token("openai"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = SecretsConfig::load_from_path(&dir.path().join("secrets.toml")).unwrap();
        assert!(config.api_tokens.is_empty());
    }

    #[test]
    fn test_environment_wins() {
        let secrets = with_token("from-file");
        assert_eq!(
            pick_api_key(Some("from-env".to_string()), &secrets).as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_blank_environment_falls_back_to_file() {
        let secrets = with_token("from-file");
        assert_eq!(
            pick_api_key(Some("  ".to_string()), &secrets).as_deref(),
            Some("from-file")
        );
        assert_eq!(pick_api_key(None, &secrets).as_deref(), Some("from-file"));
    }

    #[test]
    fn test_nothing_configured() {
        assert!(pick_api_key(None, &SecretsConfig::default()).is_none());
    }
}
