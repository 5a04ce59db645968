//! Store configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is honoured when present.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_BUSY_TIMEOUT_MS, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL,
    DEFAULT_RUST_LOG,
};

/// Main configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Store location: a `sqlite:` URL, a `jdbc:sqlite:` URL or a plain file path
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub rust_log: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
            busy_timeout_ms: parse_var("DATABASE_BUSY_TIMEOUT_MS", DEFAULT_DATABASE_BUSY_TIMEOUT_MS)?,
        })
    }

    /// Configuration for a given store location with default pool settings
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            busy_timeout_ms: DEFAULT_DATABASE_BUSY_TIMEOUT_MS,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl LoggingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let json = match env::var("LOG_FORMAT") {
            Ok(format) => parse_log_format(&format)?,
            Err(_) => false,
        };

        Ok(Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
            json,
        })
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        Err(_) => Ok(default),
    }
}

fn parse_log_format(format: &str) -> Result<bool, ConfigError> {
    match format.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(true),
        "text" | "pretty" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
