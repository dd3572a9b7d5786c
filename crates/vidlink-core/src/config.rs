//! Configuration module
//!
//! Settings are read from the process environment, after loading an optional
//! `.env` file. Unset or unparsable values fall back to the defaults below.

use std::env;
use std::str::FromStr;

const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_IMPORT_SIZE_BYTES: usize = 1024 * 1024;
const MIN_TOKEN_LENGTH: usize = 32;

/// Where video links are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStoreBackend {
    Postgres,
    /// Process-local store; data is lost on restart.
    Memory,
}

impl FromStr for LinkStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(LinkStoreBackend::Postgres),
            "memory" => Ok(LinkStoreBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown LINK_STORE_BACKEND '{}', expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

/// Console log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "pretty" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown LOG_FORMAT '{}'", other)),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub link_store_backend: LinkStoreBackend,
    /// Bearer token granting read and write access.
    pub organizer_api_token: String,
    /// Bearer token granting read access only.
    pub viewer_api_token: Option<String>,
    /// Bearer token for reviewers: may read the schedule, may not change settings.
    pub reviewer_api_token: Option<String>,
    pub max_import_size_bytes: usize,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let link_store_backend = env::var("LINK_STORE_BACKEND")
            .ok()
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(LinkStoreBackend::Postgres);

        let database_url = match link_store_backend {
            LinkStoreBackend::Postgres => env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?,
            LinkStoreBackend::Memory => env::var("DATABASE_URL").unwrap_or_default(),
        };

        let organizer_api_token = env::var("ORGANIZER_API_TOKEN")
            .map_err(|_| anyhow::anyhow!("ORGANIZER_API_TOKEN environment variable not set"))?;

        let log_format = env::var("LOG_FORMAT")
            .ok()
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(LogFormat::Compact);

        Ok(Config {
            server_port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SERVER_PORT),
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            link_store_backend,
            organizer_api_token,
            viewer_api_token: env::var("VIEWER_API_TOKEN").ok().filter(|s| !s.is_empty()),
            reviewer_api_token: env::var("REVIEWER_API_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            max_import_size_bytes: env::var("MAX_IMPORT_SIZE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_IMPORT_SIZE_BYTES),
            log_format,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.organizer_api_token.len() < MIN_TOKEN_LENGTH {
            return Err(anyhow::anyhow!(
                "ORGANIZER_API_TOKEN must be at least {} characters long",
                MIN_TOKEN_LENGTH
            ));
        }

        for (name, token) in [
            ("VIEWER_API_TOKEN", &self.viewer_api_token),
            ("REVIEWER_API_TOKEN", &self.reviewer_api_token),
        ] {
            if let Some(token) = token {
                if token.len() < MIN_TOKEN_LENGTH {
                    return Err(anyhow::anyhow!(
                        "{} must be at least {} characters long",
                        name,
                        MIN_TOKEN_LENGTH
                    ));
                }
                if token == &self.organizer_api_token {
                    return Err(anyhow::anyhow!(
                        "{} must differ from ORGANIZER_API_TOKEN",
                        name
                    ));
                }
            }
        }

        if self.link_store_backend == LinkStoreBackend::Postgres
            && !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_import_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_IMPORT_SIZE_BYTES cannot be 0"));
        }

        Ok(())
    }
}
