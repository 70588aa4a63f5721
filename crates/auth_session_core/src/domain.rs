//! crates/auth_session_core/src/domain.rs
//!
//! Defines the pure, core data structures for the client session.
//! These structs are independent of any storage or serialization format.

/// Identity snapshot taken from the last successful authentication.
///
/// The contents are opaque to the session layer; nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: Option<String>,
    pub role: String,
}

/// An access/refresh token pair as issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// Returned by login and registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub user: User,
    pub tokens: TokenPair,
}

// Registration input - contains the plaintext password, never persisted
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: Option<String>,
}

/// The authenticated session of the current process.
///
/// `Session::default()` is the empty, unauthenticated state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    /// Milliseconds since the Unix epoch of the last sign-in or token rotation.
    pub last_refresh_check: Option<i64>,
}

impl Session {
    /// True when every field is in its initial state.
    pub fn is_empty(&self) -> bool {
        *self == Session::default()
    }

    /// True when `is_authenticated` agrees with the presence of user and both tokens.
    pub fn is_consistent(&self) -> bool {
        let populated =
            self.user.is_some() && self.access_token.is_some() && self.refresh_token.is_some();
        self.is_authenticated == populated
    }
}
