//! services/auth_client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

use crate::adapters::file_store::DEFAULT_STORAGE_KEY;
use crate::adapters::http_api::DEFAULT_API_PREFIX;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub auth_api_url: String,
    pub auth_api_prefix: String,
    pub session_dir: PathBuf,
    pub storage_key: String,
    pub http_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Auth Service ---
        let auth_api_url = lookup("AUTH_API_URL")
            .ok_or_else(|| ConfigError::MissingVar("AUTH_API_URL".to_string()))?;
        if !auth_api_url.starts_with("http://") && !auth_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "AUTH_API_URL".to_string(),
                format!("'{}' is not an http(s) URL", auth_api_url),
            ));
        }

        let auth_api_prefix =
            lookup("AUTH_API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        if !auth_api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue(
                "AUTH_API_PREFIX".to_string(),
                format!("'{}' must start with '/'", auth_api_prefix),
            ));
        }
        let auth_api_prefix = auth_api_prefix.trim_end_matches('/').to_string();

        let http_timeout_str = lookup("HTTP_TIMEOUT_SECS").unwrap_or_else(|| "10".to_string());
        let http_timeout = http_timeout_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue("HTTP_TIMEOUT_SECS".to_string(), e.to_string()))?;

        // --- Session Storage ---
        let session_dir = lookup("SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.auth-session"));

        let storage_key =
            lookup("SESSION_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.is_empty() || storage_key.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue(
                "SESSION_STORAGE_KEY".to_string(),
                format!("'{}' is not a valid storage key", storage_key),
            ));
        }

        // --- Logging ---
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            auth_api_url,
            auth_api_prefix,
            session_dir,
            storage_key,
            http_timeout,
            log_level,
        })
    }
}
