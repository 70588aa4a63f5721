//! Shared helpers for the auth client integration tests.

#![allow(dead_code)]

use auth_session_core::domain::User;
use auth_session_core::ports::Clock;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// A clock that only moves when told to.
pub struct TestClock(AtomicI64);

impl TestClock {
    pub fn at(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// A signed refresh token whose `exp` lies `days` after `now_ms`.
pub fn refresh_token_expiring_in(days: i64, now_ms: i64) -> String {
    let claims = json!({
        "sub": "1",
        "email": "a@b.com",
        "role": "USER",
        "type": "refresh",
        "iat": now_ms / 1000,
        "exp": (now_ms + days * DAY_MS) / 1000,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

pub fn user() -> User {
    User {
        id: "1".to_string(),
        email: "a@b.com".to_string(),
        username: "a".to_string(),
        name: None,
        role: "USER".to_string(),
    }
}

pub fn user_json() -> Value {
    json!({
        "id": "1",
        "externalId": "",
        "email": "a@b.com",
        "username": "a",
        "name": "",
        "picture": "",
        "role": "USER",
        "provider": "LOCAL",
        "emailVerified": true,
        "isActive": true,
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

pub fn auth_response_json(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "user": user_json(),
        "accessToken": access_token,
        "refreshToken": refresh_token,
        "expiresIn": 900
    })
}
