/// Configuration management for the video catalog service
///
/// Loads configuration from environment variables.
use anyhow::{anyhow, Result};
use db_pool::DbConfig;
use std::str::FromStr;

use crate::services::DeletePolicy;
use crate::SERVICE_NAME;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub grpc: GrpcConfig,
    /// Present whenever the postgres store is selected
    pub database: Option<DbConfig>,
    pub catalog: CatalogConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port for health checks and metrics
    pub http_port: u16,
}

#[derive(Debug, Clone)]
pub struct GrpcConfig {
    pub port: u16,
}

/// Which [`VideoRepository`](crate::repository::VideoRepository) backs the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Process-local store; contents are lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown video store: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub store: StoreBackend,
    pub delete_policy: DeletePolicy,
    /// Apply embedded migrations at startup (postgres store only)
    pub run_migrations: bool,
}

const DEFAULT_HTTP_PORT: u16 = 8090;
const DEFAULT_GRPC_PORT: u16 = 50061;

fn parse_enum<T: FromStr<Err = String> + Default>(key: &str) -> Result<T> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value.parse().map_err(|e| anyhow!("{}: {}", key, e))
        }
        _ => Ok(T::default()),
    }
}

fn parse_port(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_port("HTTP_PORT", DEFAULT_HTTP_PORT),
        };

        let grpc = GrpcConfig {
            port: parse_port("GRPC_PORT", DEFAULT_GRPC_PORT),
        };

        let catalog = CatalogConfig {
            store: parse_enum("VIDEO_STORE")?,
            delete_policy: parse_enum("VIDEO_DELETE_POLICY")?,
            run_migrations: std::env::var("RUN_MIGRATIONS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
        };

        let database = match catalog.store {
            StoreBackend::Postgres => {
                Some(DbConfig::from_env(SERVICE_NAME).map_err(|e| anyhow!(e))?)
            }
            StoreBackend::Memory => None,
        };

        Ok(Config {
            app,
            grpc,
            database,
            catalog,
        })
    }
}
