// Configuration management
//
// Priority order: CLI -> ~/.infra-insight/config.toml -> defaults.
// API credentials come from the environment first, then secrets.toml.

pub mod secrets;
pub mod settings;

pub use secrets::{resolve_api_key, SecretsConfig, GEMINI_PROVIDER};
pub use settings::{AppConfig, AssistantConfig, DashboardConfig, ServerConfig};

use std::path::PathBuf;

/// Directory holding config.toml and secrets.toml (~/.infra-insight)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".infra-insight"))
}
