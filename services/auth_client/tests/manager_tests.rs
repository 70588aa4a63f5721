//! Integration tests for the session manager against a mocked auth service

mod common;

use auth_client_lib::adapters::{HttpAuthApi, JwtExpiryChecker, MemorySessionStorage};
use auth_client_lib::error::ClientError;
use auth_client_lib::SessionManager;
use auth_session_core::domain::RegisterRequest;
use auth_session_core::store::SessionStore;
use common::{auth_response_json, refresh_token_expiring_in, user, user_json, TestClock, HOUR_MS};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOW: i64 = 1_700_000_000_000;

struct Fixture {
    server: MockServer,
    storage: Arc<MemorySessionStorage>,
    clock: Arc<TestClock>,
}

impl Fixture {
    async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            storage: Arc::new(MemorySessionStorage::new()),
            clock: Arc::new(TestClock::at(NOW)),
        }
    }

    fn manager(&self) -> SessionManager {
        let checker = Arc::new(JwtExpiryChecker::new(self.clock.clone()));
        let store = SessionStore::open(self.storage.clone(), checker, self.clock.clone());
        let api = HttpAuthApi::new(self.server.uri(), Duration::from_secs(5)).unwrap();
        SessionManager::new(store, Arc::new(api))
    }

    async fn mock_login(&self, access_token: &str, refresh_token: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(auth_response_json(access_token, refresh_token)),
            )
            .mount(&self.server)
            .await;
    }
}

#[tokio::test]
async fn test_login_establishes_session() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    let mut manager = fx.manager();

    let signed_in = manager.login("a@b.com", "hunter22").await.unwrap();
    assert_eq!(signed_in, user());

    let status = manager.status();
    assert!(status.authenticated);
    assert_eq!(status.user, Some(user()));
    assert_eq!(status.last_refresh_check, Some(NOW));
    assert_eq!(manager.store().access_token(), Some("tok1"));
}

#[tokio::test]
async fn test_failed_login_leaves_session_untouched() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();

    let result = manager.login("a@b.com", "wrong").await;
    assert!(result.is_err());
    assert!(!manager.status().authenticated);
    assert!(fx.storage.raw().is_none());
}

#[tokio::test]
async fn test_register_establishes_session() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(auth_response_json("tok1", "reftok1")))
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();

    let request = RegisterRequest {
        email: "a@b.com".to_string(),
        username: "a".to_string(),
        password: "hunter22".to_string(),
        name: None,
    };
    manager.register(&request).await.unwrap();
    assert!(manager.status().authenticated);
}

#[tokio::test]
async fn test_session_is_restored_by_a_new_manager() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    fx.manager().login("a@b.com", "hunter22").await.unwrap();

    let manager = fx.manager();
    assert!(manager.status().authenticated);
    assert_eq!(manager.store().refresh_token(), Some("reftok1"));
}

#[tokio::test]
async fn test_refresh_rotates_token_pair() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .and(body_json(json!({"refreshToken": "reftok1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "tok2",
            "refreshToken": "reftok2",
            "expiresIn": 900
        })))
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();
    manager.login("a@b.com", "hunter22").await.unwrap();

    fx.clock.advance(10_000);
    manager.refresh().await.unwrap();

    let store = manager.store();
    assert_eq!(store.access_token(), Some("tok2"));
    assert_eq!(store.refresh_token(), Some("reftok2"));
    assert_eq!(store.last_refresh_check(), Some(NOW + 10_000));
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_access_only_refresh_keeps_check_timestamp() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "tok2"})))
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();
    manager.login("a@b.com", "hunter22").await.unwrap();

    fx.clock.advance(10_000);
    manager.refresh().await.unwrap();

    let store = manager.store();
    assert_eq!(store.access_token(), Some("tok2"));
    assert_eq!(store.refresh_token(), Some("reftok1"));
    assert_eq!(store.last_refresh_check(), Some(NOW));
}

#[tokio::test]
async fn test_rejected_refresh_signs_out() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();
    manager.login("a@b.com", "hunter22").await.unwrap();

    let result = manager.refresh().await;
    assert!(matches!(result, Err(ClientError::NotAuthenticated)));
    assert!(!manager.status().authenticated);
    assert!(fx.storage.raw().is_none());
}

#[tokio::test]
async fn test_server_error_during_refresh_keeps_session() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();
    manager.login("a@b.com", "hunter22").await.unwrap();

    assert!(matches!(manager.refresh().await, Err(ClientError::Port(_))));
    assert!(manager.status().authenticated);
    assert_eq!(manager.store().access_token(), Some("tok1"));
}

#[tokio::test]
async fn test_refresh_without_session_is_not_authenticated() {
    let fx = Fixture::start().await;
    let mut manager = fx.manager();
    assert!(matches!(
        manager.refresh().await,
        Err(ClientError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_refresh_if_needed_waits_for_the_hour_and_the_threshold() {
    let fx = Fixture::start().await;
    let expiring = refresh_token_expiring_in(3, NOW);
    let fresh = refresh_token_expiring_in(30, NOW);
    fx.mock_login("tok1", &expiring).await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .and(body_json(json!({"refreshToken": expiring})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "tok2",
            "refreshToken": fresh,
            "expiresIn": 900
        })))
        .expect(1)
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();
    manager.login("a@b.com", "hunter22").await.unwrap();

    // Within the hour after sign-in nothing is checked.
    fx.clock.advance(HOUR_MS / 2);
    assert!(!manager.refresh_if_needed().await.unwrap());

    fx.clock.advance(HOUR_MS);
    assert!(manager.status().needs_refresh);
    assert!(manager.refresh_if_needed().await.unwrap());
    assert_eq!(manager.store().refresh_token(), Some(fresh.as_str()));

    // The rotated token is far from expiry.
    fx.clock.advance(2 * HOUR_MS);
    assert!(!manager.refresh_if_needed().await.unwrap());
}

#[tokio::test]
async fn test_logout_clears_session_even_if_server_fails() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .and(body_json(json!({"refreshToken": "reftok1"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();
    manager.login("a@b.com", "hunter22").await.unwrap();

    manager.logout().await;
    assert!(!manager.status().authenticated);
    assert!(manager.store().session().is_empty());
    assert!(fx.storage.raw().is_none());
}

#[tokio::test]
async fn test_logout_without_session_skips_server() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();

    manager.logout().await;
    assert!(!manager.status().authenticated);
}

#[tokio::test]
async fn test_current_user_retries_after_refresh() {
    let fx = Fixture::start().await;
    fx.mock_login("tok1", "reftok1").await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/me"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "tok2",
            "refreshToken": "reftok2",
            "expiresIn": 900
        })))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/me"))
        .and(header("authorization", "Bearer tok2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&fx.server)
        .await;
    let mut manager = fx.manager();
    manager.login("a@b.com", "hunter22").await.unwrap();

    let me = manager.current_user().await.unwrap();
    assert_eq!(me, user());
    assert_eq!(manager.store().access_token(), Some("tok2"));
}

#[tokio::test]
async fn test_current_user_requires_session() {
    let fx = Fixture::start().await;
    let mut manager = fx.manager();
    assert!(matches!(
        manager.current_user().await,
        Err(ClientError::NotAuthenticated)
    ));
}
