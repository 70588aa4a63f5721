//! services/auth_client/src/manager.rs
//!
//! Drives the session store from auth service responses: sign-in and
//! registration establish the session, refreshes rotate tokens, and a rejected
//! refresh or a logout ends it.

use auth_session_core::domain::{RegisterRequest, User};
use auth_session_core::ports::{AuthApiService, PortError};
use auth_session_core::store::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ClientError;

/// A point-in-time view of the session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<User>,
    pub last_refresh_check: Option<i64>,
    pub needs_refresh: bool,
}

pub struct SessionManager {
    store: SessionStore,
    api: Arc<dyn AuthApiService>,
}

impl SessionManager {
    pub fn new(store: SessionStore, api: Arc<dyn AuthApiService>) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        let payload = self.api.login(email, password).await?;
        let user = payload.user.clone();
        self.store.set_auth(
            payload.user,
            payload.tokens.access_token,
            payload.tokens.refresh_token,
        );
        Ok(user)
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> Result<User, ClientError> {
        let payload = self.api.register(request).await?;
        let user = payload.user.clone();
        self.store.set_auth(
            payload.user,
            payload.tokens.access_token,
            payload.tokens.refresh_token,
        );
        Ok(user)
    }

    /// Exchanges the stored refresh token for new tokens.
    ///
    /// A rejected refresh token ends the session. Transport errors leave it intact.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let refresh_token = self
            .store
            .refresh_token()
            .ok_or(ClientError::NotAuthenticated)?
            .to_string();

        match self.api.refresh(&refresh_token).await {
            Ok(tokens) if tokens.refresh_token == refresh_token => {
                self.store.update_access_token(tokens.access_token);
                info!("Access token refreshed");
                Ok(())
            }
            Ok(tokens) => {
                self.store
                    .update_tokens(tokens.access_token, tokens.refresh_token);
                info!("Token pair rotated");
                Ok(())
            }
            Err(PortError::Unauthorized) => {
                warn!("Refresh token rejected, signing out");
                self.store.clear_auth();
                Err(ClientError::NotAuthenticated)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Refreshes only when the store asks for it. Returns whether a refresh ran.
    pub async fn refresh_if_needed(&mut self) -> Result<bool, ClientError> {
        if !self.store.needs_proactive_refresh() {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Ends the session locally; the server-side revoke is best effort.
    pub async fn logout(&mut self) {
        if let Some(refresh_token) = self.store.refresh_token().map(str::to_string) {
            if let Err(e) = self.api.logout(&refresh_token).await {
                warn!("Server-side logout failed: {}", e);
            }
        }
        self.store.clear_auth();
    }

    /// Fetches the current user, refreshing once if the access token is rejected.
    pub async fn current_user(&mut self) -> Result<User, ClientError> {
        let access_token = self
            .store
            .access_token()
            .ok_or(ClientError::NotAuthenticated)?
            .to_string();

        match self.api.me(&access_token).await {
            Err(PortError::Unauthorized) => {
                self.refresh().await?;
                let access_token = self
                    .store
                    .access_token()
                    .ok_or(ClientError::NotAuthenticated)?
                    .to_string();
                Ok(self.api.me(&access_token).await?)
            }
            result => Ok(result?),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            authenticated: self.store.is_authenticated(),
            user: self.store.user().cloned(),
            last_refresh_check: self.store.last_refresh_check(),
            needs_refresh: self.store.needs_proactive_refresh(),
        }
    }
}
