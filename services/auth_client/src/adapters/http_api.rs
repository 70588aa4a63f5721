//! services/auth_client/src/adapters/http_api.rs
//!
//! This module contains the adapter for the auth service's REST API.
//! It implements the `AuthApiService` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use auth_session_core::domain::{AuthPayload, RegisterRequest, TokenPair, User};
use auth_session_core::ports::{AuthApiService, PortError, PortResult};
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::adapters::record::{
    AuthResponseRecord, LoginBody, RefreshTokenBody, RegisterBody, TokenResponseRecord, UserRecord,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Route group the auth service mounts its endpoints under.
pub const DEFAULT_API_PREFIX: &str = "/v1/auth";

/// An adapter that implements the `AuthApiService` port against `<prefix>/*`,
/// `/v1/auth/*` unless overridden.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
    prefix: String,
}

impl HttpAuthApi {
    /// Creates a new `HttpAuthApi`. A trailing slash on `base_url` is ignored.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("authctl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            prefix: DEFAULT_API_PREFIX.to_string(),
        })
    }

    /// Mounts the endpoints under `prefix` instead of `/v1/auth`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        self.prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", prefix)
        };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}{}", self.base_url, self.prefix, path))
    }

    /// Sends a request and maps non-success statuses onto `PortError`.
    async fn send(&self, request: RequestBuilder) -> PortResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(error_from_status(status, message))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<T> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed auth service response: {}", e)))
    }
}

fn error_from_status(status: StatusCode, message: String) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
        StatusCode::NOT_FOUND => PortError::NotFound(message),
        _ => PortError::Unexpected(format!("Auth service returned {}: {}", status, message)),
    }
}

// The auth service sends "" for users without a display name.
fn user_from_record(record: UserRecord) -> User {
    let mut user = record.to_domain();
    user.name = user.name.filter(|n| !n.is_empty());
    user
}

fn payload_from_record(record: AuthResponseRecord) -> AuthPayload {
    debug!(expires_in = record.expires_in, "Received token pair");
    AuthPayload {
        user: user_from_record(record.user),
        tokens: TokenPair {
            access_token: record.access_token,
            refresh_token: record.refresh_token,
        },
    }
}

//=========================================================================================
// `AuthApiService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthApiService for HttpAuthApi {
    async fn register(&self, request: &RegisterRequest) -> PortResult<AuthPayload> {
        let body = RegisterBody {
            email: &request.email,
            username: &request.username,
            password: &request.password,
            name: request.name.as_deref(),
        };
        let record: AuthResponseRecord = self
            .execute(self.request(Method::POST, "/register").json(&body))
            .await?;
        Ok(payload_from_record(record))
    }

    async fn login(&self, email: &str, password: &str) -> PortResult<AuthPayload> {
        let body = LoginBody { email, password };
        let record: AuthResponseRecord = self
            .execute(self.request(Method::POST, "/login").json(&body))
            .await?;
        Ok(payload_from_record(record))
    }

    async fn refresh(&self, refresh_token: &str) -> PortResult<TokenPair> {
        let body = RefreshTokenBody { refresh_token };
        let record: TokenResponseRecord = self
            .execute(self.request(Method::POST, "/refresh").json(&body))
            .await?;
        debug!(expires_in = record.expires_in, "Received rotated token pair");
        Ok(record.to_domain(refresh_token))
    }

    async fn logout(&self, refresh_token: &str) -> PortResult<()> {
        let body = RefreshTokenBody { refresh_token };
        self.send(self.request(Method::POST, "/logout").json(&body))
            .await?;
        Ok(())
    }

    async fn me(&self, access_token: &str) -> PortResult<User> {
        let record: UserRecord = self
            .execute(
                self.request(Method::GET, "/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", access_token)),
            )
            .await?;
        Ok(user_from_record(record))
    }
}
