use axum::http::StatusCode;

use crate::routes::test_support::{LEARNER, TUTOR, body_json, form, get, location, send, set_cookies};

#[tokio::test]
async fn login_page_describes_form() {
    let response = send(get("/auth/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["action"], "/auth/login");
    assert_eq!(body["fields"][0], "email");
}

#[tokio::test]
async fn login_redirects_to_role_dashboard_and_sets_cookies() {
    let response = send(form("POST", "/auth/login", "email=tutor%40example.com&password=tutor123", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/tutor"));

    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=mock-access-token-2")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=mock-refresh-token-2")));
    assert!(cookies.iter().any(|c| c.starts_with("userRole=tutor")));
    assert!(cookies.iter().all(|c| c.contains("SameSite=Lax") && c.contains("Path=/")));
}

#[tokio::test]
async fn login_with_wrong_password_sets_nothing() {
    let response = send(form("POST", "/auth/login", "email=admin%40example.com&password=nope", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn signed_in_user_is_bounced_from_login_page() {
    let response = send(get("/auth/login", Some(TUTOR))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/tutor"));
}

#[tokio::test]
async fn register_redirects_to_login() {
    let body = "email=new%40example.com&password=pw&first_name=New&last_name=Learner&role=learner";
    let response = send(form("POST", "/auth/register", body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn register_with_taken_email_conflicts() {
    let body = "email=learner%40example.com&password=pw&first_name=Jane&last_name=Smith&role=learner";
    let response = send(form("POST", "/auth/register", body, None)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reset_password_acknowledges_unknown_email() {
    let response = send(form("POST", "/auth/reset-password", "email=nobody%40example.com", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn confirm_reset_with_bad_token_is_rejected() {
    let response = send(form("POST", "/auth/reset-password/confirm", "token=bogus&password=new", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_cookies() {
    let response = send(form("POST", "/auth/logout", "", Some(LEARNER))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));

    let cookies = set_cookies(&response);
    for name in ["accessToken=", "refreshToken=", "userRole="] {
        assert!(cookies.iter().any(|c| c.starts_with(name) && c.contains("Max-Age=0")), "{name} not removed");
    }
}

#[tokio::test]
async fn refresh_replaces_access_cookie() {
    let response = send(form("POST", "/auth/refresh", "", Some("refreshToken=mock-refresh-token-3; userRole=learner"))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=mock-access-token-3")));
}

#[tokio::test]
async fn failed_refresh_ends_session() {
    let cookies = "accessToken=stale; refreshToken=unknown; userRole=learner";
    let response = send(form("POST", "/auth/refresh", "", Some(cookies))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    assert!(set_cookies(&response).iter().any(|c| c.starts_with("accessToken=") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn signed_in_login_post_is_sent_to_dashboard_as_get() {
    let body = "email=tutor%40example.com&password=tutor123";
    let response = send(form("POST", "/auth/login", body, Some(TUTOR))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/tutor"));
    assert!(set_cookies(&response).is_empty());
}
