use clap::Parser;
use sectiongen_lib::config::{self, PartialConfig, PartialGenerationConfig, PartialStorageConfig};
use sectiongen_lib::server::{self, ServerAppState};
use sectiongen_lib::shutdown::{register_signal_handlers, ShutdownState};
use std::path::PathBuf;

/// sectiongen - turn a website idea into Hero/About/Contact sections
#[derive(Parser, Debug)]
#[command(name = "sectiongen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, default_value = "3000", env = "SECTIONGEN_PORT")]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Config file (defaults to the platform config dir, e.g. ~/.config/sectiongen/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for stored generations (overrides config and SECTIONGEN_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Default provider when a request names none: hosted or local
    #[arg(long)]
    provider: Option<String>,

    /// Allowed CORS origin; repeat for several. Any origin when omitted
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            generation: self.provider.clone().map(|p| PartialGenerationConfig {
                default_provider: Some(p),
            }),
            storage: self.data_dir.clone().map(|dir| PartialStorageConfig {
                data_dir: Some(dir),
            }),
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app_config = config::load_config(cli.config.as_deref(), Some(cli.overrides()))?;
    let service = sectiongen_lib::build_service(&app_config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

    rt.block_on(async {
        let shutdown_state = ShutdownState::new();
        if let Err(e) = register_signal_handlers(shutdown_state.clone()) {
            log::warn!("[startup] Failed to register signal handlers: {}", e);
        }

        let state = ServerAppState::new(app_config, service, shutdown_state);
        let cors_origins = (!cli.cors_origins.is_empty()).then(|| cli.cors_origins.clone());

        server::run_server(cli.port, &cli.bind, state, cors_origins)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    })?;

    log::info!("[shutdown] Server stopped");
    Ok(())
}
