//! Integration tests for registration, login and logout.

mod helpers;

use api::{messages, models::NewUser};
use auth::EncryptedSecret;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_consumes_invite() {
    let app = helpers::TestApp::new().await;
    app.create_invite("INV1", 1).await;

    let response = app
        .post_json(
            "/api/register",
            json!({"username": "bob", "password": "pw1", "code": "INV1"}),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["ok"], true);
    assert_eq!(response.message(), messages::REGISTER_OK);
    assert_eq!(app.invite("INV1").await.unwrap().uses, 0);

    let again = app
        .post_json(
            "/api/register",
            json!({"username": "carol", "password": "pw2", "code": "INV1"}),
            None,
        )
        .await;
    assert_eq!(again.json()["ok"], false);
    assert_eq!(again.message(), messages::INVALID_INVITE);

    let users = app.state.user_repository.list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "bob");
    assert!(!users[0].is_admin);
}

#[tokio::test]
async fn test_register_with_spent_invite() {
    let app = helpers::TestApp::new().await;
    app.create_invite("USED", 0).await;

    let response = app
        .post_json(
            "/api/register",
            json!({"username": "bob", "password": "pw1", "code": "USED"}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), messages::INVALID_INVITE);
    assert!(
        app.state
            .user_repository
            .find_by_username("bob")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_register_unknown_invite() {
    let app = helpers::TestApp::new().await;

    let response = app
        .post_json(
            "/api/register",
            json!({"username": "bob", "password": "pw1", "code": "NOPE"}),
            None,
        )
        .await;

    assert_eq!(response.message(), messages::INVALID_INVITE);
}

#[tokio::test]
async fn test_register_duplicate_username_keeps_invite() {
    let app = helpers::TestApp::new().await;
    app.create_user("bob", "original", false).await;
    app.create_invite("INV2", 1).await;

    let response = app
        .post_json(
            "/api/register",
            json!({"username": "bob", "password": "other", "code": "INV2"}),
            None,
        )
        .await;

    assert_eq!(response.json()["ok"], false);
    assert_eq!(response.message(), messages::USERNAME_TAKEN);
    assert_eq!(app.invite("INV2").await.unwrap().uses, 1);
    assert_eq!(app.state.user_repository.list().await.unwrap().len(), 1);

    // The original password still works
    let login = app
        .post_json(
            "/api/login",
            json!({"username": "bob", "password": "original"}),
            None,
        )
        .await;
    assert_eq!(login.message(), messages::LOGIN_OK);
}

#[tokio::test]
async fn test_register_empty_form() {
    let app = helpers::TestApp::new().await;
    app.create_invite("INV3", 1).await;

    let response = app
        .post_json(
            "/api/register",
            json!({"username": "bob", "password": "", "code": "INV3"}),
            None,
        )
        .await;

    assert_eq!(response.message(), messages::EMPTY_FORM);
    assert_eq!(app.invite("INV3").await.unwrap().uses, 1);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = helpers::TestApp::new().await;
    let user = app.create_user("alice", "secret", true).await;

    let response = app
        .post_json(
            "/api/login",
            json!({"username": "alice", "password": "secret"}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["ok"], true);
    assert_eq!(response.message(), messages::LOGIN_OK);

    let cookie = response.set_cookie().expect("session cookie");
    assert!(cookie.starts_with("session_hash="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));

    let token = cookie
        .trim_start_matches("session_hash=")
        .split(';')
        .next()
        .unwrap();
    let claims = app.state.jwt_service.verify(token).unwrap();
    assert_eq!(claims.id, user.id);
    assert!(claims.is_admin);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = helpers::TestApp::new().await;
    app.create_user("alice", "secret", false).await;

    let response = app
        .post_json(
            "/api/login",
            json!({"username": "alice", "password": "guess"}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["ok"], false);
    assert_eq!(response.message(), messages::WRONG_PASSWORD);
    assert!(response.set_cookie().is_none());
}

#[tokio::test]
async fn test_login_with_undecryptable_password() {
    let app = helpers::TestApp::new().await;
    app.state
        .user_repository
        .create(&NewUser {
            username: "mallory".to_string(),
            secret: EncryptedSecret {
                iv: "00".repeat(16),
                content: "ff".repeat(16),
            },
            is_admin: false,
        })
        .await
        .unwrap();

    let response = app
        .post_json(
            "/api/login",
            json!({"username": "mallory", "password": "anything"}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["ok"], false);
    assert_eq!(response.message(), messages::WRONG_PASSWORD);
    assert!(response.set_cookie().is_none());
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = helpers::TestApp::new().await;

    let response = app
        .post_json(
            "/api/login",
            json!({"username": "ghost", "password": "boo"}),
            None,
        )
        .await;

    assert_eq!(response.message(), messages::USER_NOT_FOUND);
}

#[tokio::test]
async fn test_login_without_body() {
    let app = helpers::TestApp::new().await;

    let response = app.post_json("/api/login", json!(null), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), messages::EMPTY_FORM);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = helpers::TestApp::new().await;
    let user = app.create_user("alice", "secret", false).await;
    let token = app.token_for(&user);

    let response = app.get("/logout", Some(&token)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    let cookie = response.set_cookie().expect("removal cookie");
    assert!(cookie.starts_with("session_hash="));
    assert!(cookie.contains("Max-Age=0"));
}
