//! services/auth_client/src/error.rs
//!
//! Defines the primary error type for the auth client.

use crate::config::ConfigError;
use auth_session_core::ports::PortError;

/// The primary error type for the `auth_client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error building the underlying HTTP client.
    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading a password from stdin).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation needs a signed-in session and there is none.
    #[error("Not signed in")]
    NotAuthenticated,
}
