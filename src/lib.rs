// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer

// Module declarations
pub mod assistant;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod series;
pub mod shutdown;

// Server module (HTTP/WebSocket API and dashboard page)
pub mod server;

// Re-export models for use by the binary and integration tests
pub use models::*;

use assistant::{AssistantSession, GeminiClient, ModelClient};
use catalog::ScenarioCatalog;
use config::{resolve_api_key, AppConfig, SecretsConfig};
use dashboard::DashboardState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Build the catalog and both pieces of session state from config.
///
/// `api_key` of `None` leaves the assistant without a client, so every send
/// gets the missing-key reply.
pub fn build_app(
    config: &AppConfig,
    api_key: Option<String>,
) -> Result<(DashboardState, AssistantSession), catalog::CatalogError> {
    let mut rng = match config.dashboard.seed {
        Some(seed) => {
            log::info!("Generating series with fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let catalog = ScenarioCatalog::build(&mut rng)?;
    let dashboard = DashboardState::new(Arc::new(catalog), config.dashboard.default_scenario);

    let client: Option<Arc<dyn ModelClient>> = api_key.map(|key| {
        Arc::new(GeminiClient::new(&config.assistant.api_base_url, key)) as Arc<dyn ModelClient>
    });
    let assistant = AssistantSession::with_model(client, &config.assistant.model);

    Ok((dashboard, assistant))
}

/// Resolve the assistant's API key from the environment and secrets.toml
pub fn load_api_key(config: &AppConfig) -> Option<String> {
    let secrets = match SecretsConfig::load() {
        Ok(secrets) => secrets,
        Err(e) => {
            log::warn!("Ignoring secrets file: {}", e);
            SecretsConfig::default()
        }
    };
    resolve_api_key(&config.assistant.api_key_env, &secrets)
}
