//! crates/auth_session_core/src/store.rs
//!
//! The session store: the single owner of the current `Session` and the only
//! place its fields are written. Every mutation is persisted through the injected
//! `SessionPersistence` port on a best-effort basis.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{Session, User};
use crate::ports::{Clock, PortResult, SessionPersistence, TokenExpiryChecker};

/// Minimum time between two expiry evaluations, counted from the last
/// sign-in or token rotation.
pub const REFRESH_CHECK_INTERVAL_MS: i64 = 60 * 60 * 1000;

/// A refresh token expiring within this many days should be rotated early.
pub const REFRESH_THRESHOLD_DAYS: i64 = 7;

pub struct SessionStore {
    session: Session,
    persistence: Arc<dyn SessionPersistence>,
    checker: Arc<dyn TokenExpiryChecker>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates a store, rehydrating from `persistence`.
    ///
    /// A failed or inconsistent load starts from the empty session.
    pub fn open(
        persistence: Arc<dyn SessionPersistence>,
        checker: Arc<dyn TokenExpiryChecker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = match persistence.load() {
            Ok(Some(session)) if session.is_consistent() => {
                debug!(authenticated = session.is_authenticated, "Rehydrated session");
                session
            }
            Ok(Some(_)) => {
                warn!("Stored session is inconsistent, starting unauthenticated");
                Session::default()
            }
            Ok(None) => Session::default(),
            Err(e) => {
                warn!("Failed to load stored session, starting unauthenticated: {}", e);
                Session::default()
            }
        };

        Self {
            session,
            persistence,
            checker,
            clock,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.session.refresh_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn last_refresh_check(&self) -> Option<i64> {
        self.session.last_refresh_check
    }

    /// Establishes a new session, replacing whatever was there.
    pub fn set_auth(&mut self, user: User, access_token: String, refresh_token: String) {
        info!(user_id = %user.id, "Session established");
        self.session = Session {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            is_authenticated: true,
            last_refresh_check: Some(self.clock.now_millis()),
        };
        self.persist();
    }

    /// Resets to the empty session and removes the durable copy.
    pub fn clear_auth(&mut self) {
        if !self.session.is_empty() {
            info!("Session cleared");
        }
        self.session = Session::default();
        if let Err(e) = self.persistence.clear() {
            warn!("Failed to clear stored session: {}", e);
        }
    }

    /// Replaces the access token only.
    pub fn update_access_token(&mut self, access_token: String) {
        self.session.access_token = Some(access_token);
        self.persist();
    }

    /// Replaces both tokens after a full rotation.
    pub fn update_tokens(&mut self, access_token: String, refresh_token: String) {
        debug!("Token pair rotated");
        self.session.access_token = Some(access_token);
        self.session.refresh_token = Some(refresh_token);
        self.session.last_refresh_check = Some(self.clock.now_millis());
        self.persist();
    }

    /// Whether the caller should rotate the token pair now, before the refresh
    /// token expires.
    ///
    /// Evaluations are suppressed for an hour after the last `set_auth` or
    /// `update_tokens`. This predicate never moves that timestamp itself.
    pub fn needs_proactive_refresh(&self) -> bool {
        let Some(refresh_token) = self.session.refresh_token.as_deref() else {
            return false;
        };

        if let Some(last_check) = self.session.last_refresh_check {
            if self.clock.now_millis().saturating_sub(last_check) < REFRESH_CHECK_INTERVAL_MS {
                debug!("Skipping expiry check, last rotation is under an hour old");
                return false;
            }
        }

        match self
            .checker
            .expires_within(refresh_token, REFRESH_THRESHOLD_DAYS)
        {
            Ok(expiring) => {
                debug!(expiring, "Evaluated refresh token expiry");
                expiring
            }
            Err(e) => {
                warn!("Cannot determine refresh token expiry: {}", e);
                false
            }
        }
    }

    /// Saves the current session and reports the outcome.
    pub fn flush(&self) -> PortResult<()> {
        self.persistence.save(&self.session)
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            warn!("Failed to persist session: {}", e);
        }
    }
}
