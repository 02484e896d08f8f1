mod advisor;
mod analytics;
mod cli;
mod config;
mod dashboard;
mod drafts;
mod errors;
mod identity;
mod llm_client;
mod models;
mod repository;
mod state;
mod storage;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisor::ReadinessAdvisor;
use crate::cli::Cli;
use crate::config::Config;
use crate::errors::AppError;
use crate::identity::short_id;
use crate::state::AppState;
use crate::storage::{FileStore, KvBackend, MemoryStore, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries command output.
    let level = if cli.verbose { "debug" } else { config.rust_log.as_str() };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Starting LiftTrack v{}", env!("CARGO_PKG_VERSION"));

    let advisor = ReadinessAdvisor::from_api_key(config.gemini_api_key.clone());
    if advisor.is_configured() {
        debug!("Readiness advisor configured (model: {})", llm_client::MODEL);
    }

    let result = if cli.ephemeral {
        info!("Using in-memory store; nothing will be saved");
        execute(Storage::new(MemoryStore::default()), advisor, config, cli).await
    } else {
        let storage = Storage::new(FileStore::open(&config.data_dir));
        execute(storage, advisor, config, cli).await
    };

    match result {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

async fn execute<B: KvBackend>(
    storage: Storage<B>,
    advisor: ReadinessAdvisor,
    config: Config,
    cli: Cli,
) -> Result<String, AppError> {
    let mut state = AppState::new(storage, advisor, config);
    if let Some(client) = cli.client.as_deref() {
        if state.session.load_client(client) {
            info!("Active identity {}", short_id(state.session.active_id()));
        }
    }
    cli::run(&mut state, cli.command).await
}
