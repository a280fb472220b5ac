//! Nabeeh API
//!
//! HTTP boundary over the analytics engine. Loads the incident snapshot
//! once, then serves read-only summaries as JSON.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod query;

use config::ServerConfig;
use handlers::{create_router, AppState};
use nabeeh_domain::RiskScorer;
use nabeeh_store::{SnapshotCell, StoreError};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Snapshot could not be loaded
    #[error("Snapshot error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Load the snapshot through `cell` and build the handler state
///
/// Repeated calls with the same cell reuse the first successful load.
pub async fn build_state(
    config: &ServerConfig,
    cell: &SnapshotCell,
) -> Result<AppState, ServerError> {
    let scorer = RiskScorer::new(config.scoring.to_scoring_config()?);
    let store = cell.get_or_load_file(&config.data_path).await?;
    Ok(AppState::new(store, scorer))
}

/// Start the API HTTP server
///
/// Initializes tracing, loads the snapshot, and starts the axum server.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing(&config.log_filter);

    info!("Starting Nabeeh API");
    info!("Bind address: {}", config.bind_addr());
    info!("Snapshot: {}", config.data_path.display());

    let cell = SnapshotCell::new();
    let state = build_state(&config, &cell).await?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

/// `RUST_LOG` wins over the configured filter
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_state_missing_snapshot() {
        let mut config = ServerConfig::default_config();
        config.data_path = "/nonexistent/snapshot.json".into();

        let result = build_state(&config, &SnapshotCell::new()).await;
        assert!(matches!(result, Err(ServerError::Store(StoreError::Io(_)))));
    }
}
