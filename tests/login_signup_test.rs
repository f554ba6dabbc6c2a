//! Sign-in and sign-up screens against a mock backend.

mod common;

use common::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moodlog::adapters::InMemoryTokenStore;
use moodlog::auth::{hash_password, DuplicateField};
use moodlog::domain::ActiveStack;
use moodlog::error::{AuthError, MoodlogError};
use moodlog::models::User;

const SETTLE: Duration = Duration::from_secs(5);

fn envelope(status: &str, message: &str, data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": status,
        "message": message,
        "data": data,
        "timestamp": "2025-05-02T10:00:00",
    }))
}

#[tokio::test]
async fn test_login_adopts_token() {
    let server = MockServer::start().await;
    let token = user_token(4, "bora");
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "bora@example.com",
            "password": hash_password("secret1"),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token.clone()})))
        .expect(1)
        .mount(&server)
        .await;
    mount_identity(&server, &token, 4, "bora").await;
    let store = InMemoryTokenStore::new();
    let client = client_for(&server, &store);
    let mut nav = client.navigation();
    client.session().initialize().await;
    assert_eq!(nav.next_change().await, Some(ActiveStack::Auth));

    client
        .login_screen()
        .submit("bora@example.com", "secret1")
        .await
        .unwrap();

    assert_eq!(nav.next_change().await, Some(ActiveStack::App));
    assert_eq!(store.stored_token(), Some(token));
    assert_eq!(client.session().identity(), Some(User::new("4", "bora")));
}

#[tokio::test]
async fn test_login_rejected_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "이메일 또는 비밀번호가 올바르지 않습니다"})),
        )
        .mount(&server)
        .await;
    let store = InMemoryTokenStore::new();
    let client = client_for(&server, &store);

    let err = client
        .login_screen()
        .submit("bora@example.com", "wrong-pass")
        .await
        .unwrap_err();

    assert!(matches!(err, MoodlogError::Auth(AuthError::LoginRejected { .. })));
    assert_eq!(err.user_message(), "이메일 또는 비밀번호가 올바르지 않습니다");
    assert!(store.stored_token().is_none());
}

#[tokio::test]
async fn test_login_without_token_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let client = client_for(&server, &InMemoryTokenStore::new());

    let err = client
        .login_screen()
        .submit("bora@example.com", "secret1")
        .await
        .unwrap_err();
    assert!(matches!(err, MoodlogError::Auth(AuthError::MissingToken)));
}

#[tokio::test]
async fn test_signup_burst_sends_one_check_per_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/public/check/loginId/IsDuplicate"))
        .and(body_json(json!({"loginId": "boram1"})))
        .respond_with(envelope("success", "사용 가능한 아이디", json!(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/public/check/nickname/IsDuplicate"))
        .respond_with(envelope("success", "이미 사용 중인 닉네임", json!(false)))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, &InMemoryTokenStore::new());
    let signup = client.signup_screen();

    for value in ["b", "bo", "bor", "bora", "boram", "boram1"] {
        signup.set_login_id(value);
    }
    signup.set_nickname("moon");

    let login_check = signup.settled_check(DuplicateField::LoginId, SETTLE).await;
    assert_eq!(login_check.available, Some(true));
    let nickname_check = signup.settled_check(DuplicateField::Nickname, SETTLE).await;
    assert_eq!(nickname_check.available, Some(false));
    assert_eq!(nickname_check.error.as_deref(), Some("이미 사용 중인 닉네임"));
}

#[tokio::test]
async fn test_signup_full_flow() {
    let server = MockServer::start().await;
    for field in ["loginId", "email", "nickname"] {
        Mock::given(method("POST"))
            .and(path(format!("/api/public/check/{}/IsDuplicate", field)))
            .respond_with(envelope("success", "ok", json!(true)))
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/api/public/emailCode"))
        .and(body_json(json!({"email": "moon@example.com"})))
        .respond_with(envelope("success", "인증 코드를 보냈습니다", json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/public/emailCheck"))
        .and(body_json(json!({"email": "moon@example.com", "code": "482913"})))
        .respond_with(envelope("success", "인증되었습니다", json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/public/join"))
        .and(body_json(json!({
            "loginId": "moonlight",
            "userPw": "Night0wl!",
            "email": "moon@example.com",
            "nickname": "moon",
        })))
        .respond_with(envelope("success", "회원가입이 완료되었습니다", json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, &InMemoryTokenStore::new());
    let signup = client.signup_screen();

    signup.set_login_id("moonlight");
    signup.set_email("moon@example.com");
    signup.set_nickname("moon");
    signup.set_password("Night0wl!");
    signup.set_confirm_password("Night0wl!");
    signup.set_consents(true, true);
    for field in [DuplicateField::LoginId, DuplicateField::Email, DuplicateField::Nickname] {
        assert_eq!(signup.settled_check(field, SETTLE).await.available, Some(true));
    }
    assert!(!signup.can_submit(), "email is not verified yet");

    let sent = signup.request_email_code().await.unwrap();
    assert!(sent.success);
    signup.set_email_code("482913");
    let verified = signup.verify_email_code().await.unwrap();
    assert!(verified.success);
    assert!(signup.can_submit());

    assert_eq!(signup.submit().await.unwrap(), "회원가입이 완료되었습니다");
}

#[tokio::test]
async fn test_signup_wrong_code_keeps_email_unverified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/public/check/email/IsDuplicate"))
        .respond_with(envelope("success", "ok", json!(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/public/emailCheck"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({
                "status": "fail",
                "message": "인증 코드가 일치하지 않습니다",
                "data": null,
                "timestamp": "2025-05-02T10:00:00",
            })),
        )
        .mount(&server)
        .await;
    let client = client_for(&server, &InMemoryTokenStore::new());
    let signup = client.signup_screen();

    signup.set_email("moon@example.com");
    signup.settled_check(DuplicateField::Email, SETTLE).await;
    signup.set_email_code("000000");
    let notice = signup.verify_email_code().await.unwrap();

    assert!(!notice.success);
    assert_eq!(notice.message, "인증 코드가 일치하지 않습니다");
    assert!(!signup.form().email_verified);
}
