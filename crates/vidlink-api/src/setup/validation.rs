//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use vidlink_core::{Config, LinkStoreBackend};

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production. \
                Set specific allowed origins via CORS_ORIGINS."
            ));
        }
        if config.link_store_backend == LinkStoreBackend::Memory {
            return Err(anyhow::anyhow!(
                "LINK_STORE_BACKEND=memory is not allowed in production"
            ));
        }
    }

    if config.link_store_backend == LinkStoreBackend::Postgres {
        if config.db_max_connections == 0 {
            return Err(anyhow::anyhow!("Database max connections cannot be 0"));
        }
        if config.db_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("Database timeout cannot be 0"));
        }
        if config.db_max_connections > 100 {
            tracing::warn!(
                max_connections = config.db_max_connections,
                "Database max connections is very high"
            );
        }
    }

    Ok(())
}
