//! Shared fixtures for the integration tests.
//!
//! Tests run the real reqwest adapter against a `wiremock` server and keep
//! the session token in an [`InMemoryTokenStore`].

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moodlog::adapters::{InMemoryTokenStore, ReqwestHttpClient};
use moodlog::{ClientConfig, MoodlogClient};

/// Debounce used by tests that drive the signup screen in real time.
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(20);

/// Page size used by list tests.
pub const TEST_PAGE_SIZE: usize = 2;

/// Build an unsigned three-part token carrying `claims`.
pub fn make_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.test-signature", header, payload)
}

/// Token for user `id` with login id `login_id`.
pub fn user_token(id: i64, login_id: &str) -> String {
    make_token(&json!({
        "id": id,
        "loginId": login_id,
        "iat": 1_700_000_000,
        "exp": 4_102_444_800i64,
    }))
}

pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.uri())
        .with_request_timeout(Duration::from_secs(5))
        .with_debounce_delay(TEST_DEBOUNCE)
        .with_page_size(TEST_PAGE_SIZE)
}

/// Client talking to `server` and persisting into `store`.
pub fn client_for(server: &MockServer, store: &InMemoryTokenStore) -> MoodlogClient {
    MoodlogClient::with_parts(
        test_config(server),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(store.clone()),
    )
}

/// Answer `GET /auth/me` for `token`.
pub async fn mount_identity(server: &MockServer, token: &str, id: i64, name: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id, "name": name})))
        .mount(server)
        .await;
}

/// Client with `token` already adopted as the session.
pub async fn signed_in_client(server: &MockServer, token: &str, id: i64, name: &str) -> MoodlogClient {
    mount_identity(server, token, id, name).await;
    let client = client_for(server, &InMemoryTokenStore::new());
    client
        .session()
        .sign_in(token)
        .await
        .expect("sign in should succeed");
    client
}

/// Recorded requests whose path is `p`.
pub async fn requests_to(server: &MockServer, p: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == p)
        .collect()
}
