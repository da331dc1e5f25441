//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use reelvault_core::Config;
use reelvault_db::{AccountRepository, AssetRepository};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );
    if config.media_host.public_key.is_none() || config.media_host.private_key.is_none() {
        tracing::warn!("Media host key pair not configured; GET /api/auth will fail");
    }

    let connections = database::setup_database(&config).await;

    let state = Arc::new(AppState::new(
        &config,
        Arc::new(AssetRepository::new(connections.clone())),
        Arc::new(AccountRepository::new(connections.clone())),
        connections,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
