//! services/auth_client/src/adapters/record.rs
//!
//! Serialized shapes shared by the storage adapters and the HTTP adapter.
//! The core domain types carry no serde derives; these records translate
//! between the wire/disk JSON and the domain.

use auth_session_core::domain::{Session, TokenPair, User};
use auth_session_core::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};

/// Version stamp written next to every stored snapshot.
pub const SNAPSHOT_VERSION: u32 = 0;

//=========================================================================================
// User
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: String,
}

impl UserRecord {
    pub fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            name: self.name,
            role: self.role,
        }
    }

    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

//=========================================================================================
// Session snapshot
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user: Option<UserRecord>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub last_refresh_check: Option<i64>,
}

impl SessionRecord {
    pub fn to_domain(self) -> Session {
        Session {
            user: self.user.map(UserRecord::to_domain),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            is_authenticated: self.is_authenticated,
            last_refresh_check: self.last_refresh_check,
        }
    }

    pub fn from_domain(session: &Session) -> Self {
        Self {
            user: session.user.as_ref().map(UserRecord::from_domain),
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            is_authenticated: session.is_authenticated,
            last_refresh_check: session.last_refresh_check,
        }
    }
}

/// The on-disk envelope: `{"state": {...}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SessionRecord,
    pub version: u32,
}

/// Encodes a session as a snapshot JSON document.
pub fn encode_snapshot(session: &Session) -> PortResult<String> {
    let snapshot = Snapshot {
        state: SessionRecord::from_domain(session),
        version: SNAPSHOT_VERSION,
    };
    serde_json::to_string(&snapshot)
        .map_err(|e| PortError::Storage(format!("Failed to serialize session: {}", e)))
}

/// Decodes a snapshot JSON document, rejecting unknown versions.
pub fn decode_snapshot(json: &str) -> PortResult<Session> {
    let snapshot: Snapshot = serde_json::from_str(json)
        .map_err(|e| PortError::Storage(format!("Failed to deserialize session: {}", e)))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PortError::Storage(format!(
            "Unsupported session snapshot version {}",
            snapshot.version
        )));
    }
    Ok(snapshot.state.to_domain())
}

//=========================================================================================
// Auth service payloads
//=========================================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseRecord {
    pub user: UserRecord,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponseRecord {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
}

impl TokenResponseRecord {
    /// A response without a refresh token keeps the one that was presented.
    pub fn to_domain(self, presented_refresh_token: &str) -> TokenPair {
        TokenPair {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .unwrap_or_else(|| presented_refresh_token.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenBody<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterBody<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}
