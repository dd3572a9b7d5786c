//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod stores;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidlink_core::{Config, RoleAuthorizer};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format);

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment,
        backend = ?config.link_store_backend,
        "Configuration loaded and validated successfully"
    );

    let (links, talks) = stores::setup_stores(&config).await?;
    let state = Arc::new(AppState::new(
        config.clone(),
        links,
        talks,
        Arc::new(RoleAuthorizer),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
