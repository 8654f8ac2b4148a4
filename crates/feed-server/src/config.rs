//! Server configuration
//!
//! Everything comes from the environment (after `.env`, when present):
//! `FEED_*` for the listener, `DATABASE_*` for the catalog pool, `CORS_*`
//! for the feed endpoint and the export variables read by
//! [`ExportConfig::from_env`]. A variable that is set but does not parse is
//! an error; only unset variables take their defaults.

use anyhow::Context;
use std::str::FromStr;

use crate::export::ExportConfig;

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/product_feed";
/// The feed endpoint and the daily export are the only database users
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Origin of the agentic checkout client that reads the feed
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "https://chatgpt.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Pool over the `feed_products` catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Origins allowed to fetch `/api/v1/openai/product_feed` from a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    /// Ignored when the origin list is a wildcard
    pub allow_credentials: bool,
}

impl Config {
    /// Load `.env`, read every section and validate the result
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("FEED_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_or("FEED_PORT", DEFAULT_SERVER_PORT)?,
                shutdown_timeout_secs: env_or(
                    "FEED_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                )?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
                acquire_timeout_secs: env_or(
                    "DATABASE_ACQUIRE_TIMEOUT",
                    DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .map(|raw| parse_origins(&raw))
                    .unwrap_or_else(|_| vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()]),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", false)?,
            },
            export: ExportConfig::from_env()?,
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("FEED_PORT must be greater than 0");
        }
        if self.database.url.is_empty() {
            anyhow::bail!("DATABASE_URL cannot be empty");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be greater than 0");
        }
        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        self.export.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                acquire_timeout_secs: DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: false,
            },
            export: ExportConfig::default(),
        }
    }
}

/// Read `key`, falling back to `default` only when it is unset or blank
pub fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(key, &raw),
        _ => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
