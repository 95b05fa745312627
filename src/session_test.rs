use std::sync::Arc;

use super::*;
use crate::services::mock_auth::MockAuthBackend;
use crate::services::users::InMemoryUserRepository;
use crate::token_store::MemoryTokenStore;
use crate::types::TokenPair;

fn context() -> SessionContext {
    let repo = Arc::new(InMemoryUserRepository::seeded());
    SessionContext::new(AuthClient::new(Arc::new(MockAuthBackend::new(repo))))
}

fn stored(role: Option<Role>) -> MemoryTokenStore {
    let mut store = MemoryTokenStore::new();
    let pair = TokenPair { access: "mock-access-token-1".into(), refresh: "mock-refresh-token-1".into() };
    store.save(&pair, role.unwrap_or(Role::Learner));
    store
}

// =============================================================================
// hydrate
// =============================================================================

#[test]
fn new_context_is_loading() {
    let ctx = context();
    assert!(ctx.is_loading());
    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.role(), None);
}

#[test]
fn hydrate_without_token_is_unauthenticated() {
    let mut ctx = context();
    ctx.hydrate(&MemoryTokenStore::new());
    assert_eq!(ctx.state(), &SessionState::Unauthenticated);
}

#[test]
fn hydrate_with_token_trusts_stored_role() {
    let mut ctx = context();
    ctx.hydrate(&stored(Some(Role::Tutor)));
    assert!(ctx.is_authenticated());
    assert_eq!(ctx.role(), Some(Role::Tutor));
    assert!(ctx.user().is_none());
}

#[test]
fn hydrate_with_token_but_no_role_defaults_to_learner() {
    let mut store = MemoryTokenStore::new();
    store.set_access_token("mock-access-token-1");
    let mut ctx = context();
    ctx.hydrate(&store);
    assert_eq!(ctx.role(), Some(Role::Learner));
}

// =============================================================================
// actions
// =============================================================================

#[tokio::test]
async fn login_redirects_to_role_dashboard() {
    let cases = [
        ("admin@example.com", "admin123", "/dashboard/admin"),
        ("tutor@example.com", "tutor123", "/dashboard/tutor"),
        ("learner@example.com", "learner123", "/dashboard/learner"),
    ];
    for (email, password, expected) in cases {
        let mut ctx = context();
        let mut store = MemoryTokenStore::new();
        ctx.hydrate(&store);
        let target = ctx.login(&mut store, email, password).await.unwrap();
        assert_eq!(target, expected);
        assert_eq!(ctx.user().unwrap().email, email);
    }
}

#[tokio::test]
async fn failed_login_keeps_state() {
    let mut ctx = context();
    let mut store = MemoryTokenStore::new();
    ctx.hydrate(&store);
    let err = ctx.login(&mut store, "admin@example.com", "nope").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(ctx.state(), &SessionState::Unauthenticated);
}

#[tokio::test]
async fn register_redirects_to_login() {
    let mut ctx = context();
    let data = RegisterData {
        email: "fresh@example.com".into(),
        password: "pw".into(),
        first_name: "Fresh".into(),
        last_name: "Face".into(),
        role: Role::Learner,
    };
    assert_eq!(ctx.register(&data).await.unwrap(), LOGIN_PATH);
}

#[tokio::test]
async fn logout_clears_store_and_state() {
    let mut ctx = context();
    let mut store = MemoryTokenStore::new();
    ctx.login(&mut store, "admin@example.com", "admin123").await.unwrap();
    assert_eq!(ctx.logout(&mut store), LOGIN_PATH);
    assert_eq!(ctx.state(), &SessionState::Unauthenticated);
    assert!(store.is_empty());
}

#[test]
fn refresh_failure_forces_logout() {
    let mut ctx = context();
    let mut store = stored(Some(Role::Admin));
    ctx.hydrate(&store);
    assert_eq!(ctx.refresh_failed(&mut store), LOGIN_PATH);
    assert!(!ctx.is_authenticated());
    assert!(!store.is_authenticated());
}
