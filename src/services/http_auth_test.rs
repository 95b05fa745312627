use super::*;
use crate::types::Role;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with(route: &str, status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let backend = HttpAuthBackend::new("http://localhost:8000/api/");
    assert_eq!(backend.base_url, "http://localhost:8000/api");
}

#[tokio::test]
async fn login_posts_credentials_and_parses_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({ "email": "admin@example.com", "password": "admin123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1",
            "user": { "id": 1, "email": "admin@example.com", "first_name": "Admin", "last_name": "User", "role": "admin" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpAuthBackend::new(format!("{}/api", server.uri()));
    let response = backend.login("admin@example.com", "admin123").await.unwrap();
    assert_eq!(response.access, "a1");
    assert_eq!(response.user.role, Role::Admin);
    assert_eq!(response.user.user_id, 1);
}

#[tokio::test]
async fn login_401_is_invalid_credentials() {
    let server = server_with("/auth/login/", 401, json!({ "detail": "No active account" })).await;
    let backend = HttpAuthBackend::new(server.uri());
    let err = backend.login("x@y.z", "bad").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn register_sends_snake_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register/"))
        .and(body_json(json!({
            "email": "n@example.com",
            "password": "pw",
            "first_name": "New",
            "last_name": "User",
            "role": "tutor"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "Registration successful" })))
        .mount(&server)
        .await;

    let backend = HttpAuthBackend::new(server.uri());
    let data = RegisterData {
        email: "n@example.com".into(),
        password: "pw".into(),
        first_name: "New".into(),
        last_name: "User".into(),
        role: Role::Tutor,
    };
    let msg = backend.register(&data).await.unwrap();
    assert_eq!(msg.message, "Registration successful");
}

#[tokio::test]
async fn register_conflict_is_user_exists() {
    let server = server_with("/auth/register/", 409, json!({ "detail": "exists" })).await;
    let backend = HttpAuthBackend::new(server.uri());
    let data = RegisterData {
        email: "n@example.com".into(),
        password: "pw".into(),
        first_name: "New".into(),
        last_name: "User".into(),
        role: Role::Learner,
    };
    assert!(matches!(backend.register(&data).await, Err(AuthError::UserExists)));
}

#[tokio::test]
async fn refresh_posts_refresh_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .and(body_json(json!({ "refresh": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "a2" })))
        .mount(&server)
        .await;

    let backend = HttpAuthBackend::new(server.uri());
    let response = backend.refresh_token("r1").await.unwrap();
    assert_eq!(response.access, "a2");
}

#[tokio::test]
async fn refresh_401_is_invalid_refresh_token() {
    let server = server_with("/auth/token/refresh/", 401, json!({ "detail": "Token is invalid or expired" })).await;
    let backend = HttpAuthBackend::new(server.uri());
    assert!(matches!(backend.refresh_token("r1").await, Err(AuthError::InvalidRefreshToken)));
}

#[tokio::test]
async fn server_detail_is_propagated_unchanged() {
    let server = server_with("/auth/reset-password/", 500, json!({ "detail": "Mail relay offline" })).await;
    let backend = HttpAuthBackend::new(server.uri());
    let err = backend.reset_password("a@b.c").await.unwrap_err();
    assert_eq!(err.to_string(), "Mail relay offline");
}

#[tokio::test]
async fn missing_detail_uses_fallback_message() {
    let server = server_with("/auth/reset-password/confirm/", 503, json!({})).await;
    let backend = HttpAuthBackend::new(server.uri());
    let err = backend.confirm_reset_password("t", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to reset password");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let backend = HttpAuthBackend::new("http://127.0.0.1:9");
    let err = backend.login("a@b.c", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::NetworkOrServer(_)));
}

#[tokio::test]
async fn confirm_reset_400_is_invalid_reset_token() {
    let server = server_with("/auth/reset-password/confirm/", 400, json!({ "detail": "Invalid token" })).await;
    let backend = HttpAuthBackend::new(server.uri());
    let err = backend.confirm_reset_password("stale", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidResetToken));
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unmapped_4xx_stays_a_client_error() {
    let server = server_with("/auth/register/", 400, json!({ "detail": "Admin accounts cannot self-register" })).await;
    let backend = HttpAuthBackend::new(server.uri());
    let data = RegisterData {
        email: "boss@example.com".into(),
        password: "pw".into(),
        first_name: "Boss".into(),
        last_name: "Person".into(),
        role: Role::Admin,
    };
    let err = backend.register(&data).await.unwrap_err();
    assert!(matches!(&err, AuthError::Validation(detail) if detail == "Admin accounts cannot self-register"));
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn server_error_stays_bad_gateway() {
    let server = server_with("/auth/reset-password/", 500, json!({ "detail": "Mail relay offline" })).await;
    let backend = HttpAuthBackend::new(server.uri());
    let err = backend.reset_password("a@b.c").await.unwrap_err();
    assert!(matches!(err, AuthError::NetworkOrServer(_)));
    assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
}
