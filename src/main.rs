use clap::Parser;
use infra_insight_lib::config::AppConfig;
use infra_insight_lib::models::ScenarioId;
use infra_insight_lib::server::{self, ServerAppState};
use infra_insight_lib::shutdown::{self, ShutdownState};
use std::path::PathBuf;

/// InfraInsight - infrastructure case-study dashboard with an AI assistant
#[derive(Parser, Debug)]
#[command(name = "infra-insight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, env = "INFRA_INSIGHT_PORT")]
    port: Option<u16>,

    /// Address to bind the server to
    #[arg(long, env = "INFRA_INSIGHT_BIND")]
    bind: Option<String>,

    /// Config file (defaults to ~/.infra-insight/config.toml)
    #[arg(long, env = "INFRA_INSIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Scenario shown on first load (serverless or kubernetes)
    #[arg(long)]
    scenario: Option<ScenarioId>,

    /// Seed for the synthetic metric series
    #[arg(long)]
    seed: Option<u64>,

    /// Hosted model name
    #[arg(long)]
    model: Option<String>,
}

impl Cli {
    /// CLI flags take priority over the config file
    fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(scenario) = self.scenario {
            config.dashboard.default_scenario = scenario;
        }
        if let Some(seed) = self.seed {
            config.dashboard.seed = Some(seed);
        }
        if let Some(model) = &self.model {
            config.assistant.model = model.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let api_key = infra_insight_lib::load_api_key(&config);
    if api_key.is_none() {
        log::warn!(
            "No API key found in ${} or secrets.toml; the assistant will reply with a configuration notice",
            config.assistant.api_key_env
        );
    }

    let (dashboard, assistant) = infra_insight_lib::build_app(&config, api_key)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let shutdown_state = ShutdownState::new();
        if let Err(e) = shutdown::register_signal_handlers(shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        let state = ServerAppState::new(dashboard, assistant, shutdown_state)?;

        server::run_server(
            config.server.port,
            &config.server.bind,
            state,
            &config.server.cors_origins,
        )
        .await
        .map_err(|e| anyhow::anyhow!(e))
    })
}
