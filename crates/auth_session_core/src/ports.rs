//! crates/auth_session_core/src/ports.rs
//!
//! Defines the service contracts (traits) the session store depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of where sessions are stored, how tokens are encoded, and
//! how the auth service is reached.

use async_trait::async_trait;

use crate::domain::{AuthPayload, RegisterRequest, Session, TokenPair, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Why a token's expiry could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenParseError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload could not be decoded: {0}")]
    InvalidPayload(String),
    #[error("token carries no expiry claim")]
    MissingExpiry,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for the session snapshot.
pub trait SessionPersistence: Send + Sync {
    /// Returns the stored snapshot, or `None` when nothing has been stored yet.
    fn load(&self) -> PortResult<Option<Session>>;

    fn save(&self, session: &Session) -> PortResult<()>;

    /// Removes the durable copy entirely.
    fn clear(&self) -> PortResult<()>;
}

pub trait TokenExpiryChecker: Send + Sync {
    /// Whether `token` expires within `threshold_days` from now.
    fn expires_within(&self, token: &str, threshold_days: i64) -> Result<bool, TokenParseError>;
}

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

#[async_trait]
pub trait AuthApiService: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> PortResult<AuthPayload>;

    async fn login(&self, email: &str, password: &str) -> PortResult<AuthPayload>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> PortResult<TokenPair>;

    /// Revokes the server-side session bound to `refresh_token`.
    async fn logout(&self, refresh_token: &str) -> PortResult<()>;

    async fn me(&self, access_token: &str) -> PortResult<User>;
}
