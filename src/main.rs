//! echo-relay server entry point.
//!
//! Connects the message store, then serves the WebSocket relay until
//! SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use echo_relay::app_state::AppState;
use echo_relay::config::RelayConfig;
use echo_relay::persistence::{MessageStore, NoopStore, PostgresStore};
use echo_relay::server::{serve, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(addr = %config.listen_addr, "starting echo-relay");

    // Build persistence layer; an unreachable store is fatal
    let store: Arc<dyn MessageStore> = if config.persistence_enabled {
        let store = PostgresStore::connect(&config).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to connect to message store");
        })?;
        if config.run_migrations {
            store.run_migrations().await.context("running migrations")?;
        }
        tracing::info!("message store connected");
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, messages will not be stored");
        Arc::new(NoopStore)
    };

    // Build application state
    let app_state = AppState {
        store: Arc::clone(&store),
        max_message_bytes: config.max_message_bytes,
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    serve(listener, app_state, shutdown_signal()).await?;

    store.close().await;
    tracing::info!("message store closed, shutdown complete");

    Ok(())
}
