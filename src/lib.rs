pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod listing_cache;
pub mod models;
pub mod services;
pub mod validation;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::core_state::{CoreError, CoreState};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot open clinic database: {0}")]
    Core(#[from] CoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Start the clinic backend and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(CoreState::open(&config)?);
    let server = api::start_api_server_on(core, config.bind_addr, config.request_timeout).await?;
    tracing::info!(addr = %server.addr, "Listening");

    tokio::signal::ctrl_c().await.map_err(StartupError::Signal)?;
    tracing::info!("Ctrl-C received, shutting down");
    server.stop().await;
    Ok(())
}
