//! Dalali brokerage platform API server.
//!
//! A multi-tenant record service for real-estate brokerages.

use clap::Parser;
use dalali_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::info;

#[cfg(feature = "sqlite")]
use dalali_store::backends::sqlite::SqliteStore;

/// Creates and initializes a SQLite store from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    let store = match config.database_url.as_deref() {
        Some(path) => {
            info!(database = %path, "Initializing SQLite store");
            SqliteStore::open(path)?
        }
        None => {
            info!("Initializing in-memory SQLite store; data is lost on restart");
            SqliteStore::in_memory()?
        }
    };
    store.init_schema()?;
    Ok(store)
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received, draining connections");
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        "Starting Dalali API server"
    );

    start_sqlite(config).await
}

/// Starts the server over the SQLite store.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    let store = create_sqlite_store(&config)?;
    let app = create_app_with_config(store, config.clone());
    serve(app, &config).await
}

/// Fallback when the sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite store requires the 'sqlite' feature. \
         Build with: cargo build -p dalali --features sqlite"
    )
}
