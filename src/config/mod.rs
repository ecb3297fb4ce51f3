//! Configuration module for the bug tracker backend.
//!
//! Configuration is loaded from environment variables. The database URL has
//! no default: the server refuses to start without it.

use std::env;
use std::net::SocketAddr;

pub const DATABASE_URL_VAR: &str = "BUGTRACKER_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "BUGTRACKER_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "BUGTRACKER_LOG_LEVEL";
pub const LOG_JSON_VAR: &str = "BUGTRACKER_LOG_JSON";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx connection string for the SQLite database
    pub database_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

/// Reasons the configuration cannot be loaded.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { var: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid { var, value } => write!(f, "invalid {}: {:?}", var, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;

        let bind_addr_raw = lookup(BIND_ADDR_VAR).unwrap_or_else(|| "127.0.0.1:5000".to_string());
        let bind_addr = bind_addr_raw.parse().map_err(|_| ConfigError::Invalid {
            var: BIND_ADDR_VAR,
            value: bind_addr_raw.clone(),
        })?;

        let log_level = lookup(LOG_LEVEL_VAR).unwrap_or_else(|| "info".to_string());

        let log_json = match lookup(LOG_JSON_VAR).as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_JSON_VAR,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            bind_addr,
            log_level,
            log_json,
        })
    }
}
