//! inlet webhook message sink.
//!
//! Main entry point. Loads configuration, opens the message store, and
//! serves HTTP until a shutdown signal arrives.

use std::sync::Arc;

use anyhow::{Context, Result};
use inlet_api::{config::LogFormat, AppState, Config};
use inlet_core::{storage::connect_options, Metrics, RealClock, Storage};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside local development.
    let dotenv = dotenvy::dotenv();

    let config = Config::load()?;
    init_tracing(&config);

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }
    info!(
        database_url = %config.database_url,
        max_connections = config.database_max_connections,
        log_format = ?config.log_format,
        "Configuration loaded"
    );

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.connection_timeout())
        .connect_with(connect_options(&config.database_url))
        .await
        .context("Failed to open database")?;

    let storage = Storage::new(pool, Arc::new(RealClock::new()));
    storage.initialize().await.context("Failed to initialize schema")?;
    info!("Message store ready");

    if !config.secret_configured() {
        warn!("WEBHOOK_SECRET is not configured; readiness will report not ready");
    }

    let state = AppState::new(
        storage.clone(),
        Arc::new(Metrics::new()),
        Arc::new(RealClock::new()),
        config.signing_secret(),
    );

    let addr = config.parse_server_addr()?;
    let served = inlet_api::start_server(state, addr, config.request_timeout()).await;

    storage.close().await;
    info!("Database connections closed");

    served.context("HTTP server failed")
}

/// Installs the global subscriber: JSON lines by default, human-readable
/// output when `LOG_FORMAT=pretty`.
fn init_tracing(config: &Config) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
    }
}
