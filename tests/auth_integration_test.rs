mod common;

use axum::http::{Method, StatusCode};
use common::{assert_envelope, TestApp, ADMIN_PASSWORD, ADMIN_USERNAME, TEST_JWT_SECRET};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

#[tokio::test]
async fn login_returns_a_usable_token() {
    let app = TestApp::spawn().await;

    let (status, payload) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_envelope(status, &payload);
    assert_eq!(payload["data"]["username"], ADMIN_USERNAME);
    let token = payload["data"]["token"].as_str().expect("token");

    let (status, _) = app
        .request(Method::GET, "/vendor/get", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::spawn().await;

    let (status, payload) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": "wrong" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &payload);
    assert!(payload["data"].is_null());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let (status, payload) = app.request(Method::GET, "/vendor/get", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &payload);

    let (status, payload) = app
        .request(Method::GET, "/vendor/get", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &payload);
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let app = TestApp::spawn().await;

    // expired well past the decoder's leeway
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": uuid::Uuid::new_v4().to_string(),
        "username": ADMIN_USERNAME,
        "jti": uuid::Uuid::new_v4().to_string(),
        "iat": now - 7200,
        "exp": now - 3600,
        "iss": "garmentflow-api",
        "aud": "garmentflow-app",
    });
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let (status, payload) = app
        .request(Method::GET, "/vendor/get", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(status, &payload);
    assert_eq!(payload["statusMessage"], "Token expired");
}

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::spawn().await;
    let (status, payload) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "ok");
}
