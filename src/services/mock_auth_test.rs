use super::*;
use crate::services::users::InMemoryUserRepository;

fn backend() -> (Arc<InMemoryUserRepository>, MockAuthBackend) {
    let repo = Arc::new(InMemoryUserRepository::seeded());
    let backend = MockAuthBackend::new(repo.clone());
    (repo, backend)
}

fn registration(email: &str, role: Role) -> RegisterData {
    RegisterData {
        email: email.into(),
        password: "pw123456".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        role,
    }
}

// =============================================================================
// token helpers
// =============================================================================

#[test]
fn bytes_to_hex_pads_single_digits() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

#[test]
fn generate_token_is_64_hex_chars_and_random() {
    let a = generate_token();
    let b = generate_token();
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[test]
fn hash_token_is_stable_sha256_hex() {
    assert_eq!(hash_token("abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}

#[test]
fn token_user_id_reads_last_segment() {
    assert_eq!(token_user_id(&access_token_for(3)), Some(3));
    assert_eq!(token_user_id(&refresh_token_for(12)), Some(12));
    assert_eq!(token_user_id("mock-refresh-token-abc"), None);
    assert_eq!(token_user_id(""), None);
}

// =============================================================================
// login / register / refresh
// =============================================================================

#[tokio::test]
async fn login_issues_mock_tokens() {
    let (_, backend) = backend();
    let response = backend.login("tutor@example.com", "tutor123").await.unwrap();
    assert_eq!(response.access, "mock-access-token-2");
    assert_eq!(response.refresh, "mock-refresh-token-2");
    assert_eq!(response.user.role, Role::Tutor);
}

#[tokio::test]
async fn tutor_login_is_the_profile_owner() {
    let (repo, backend) = backend();
    let session = backend.login("tutor@example.com", "tutor123").await.unwrap().user;
    assert_eq!((session.first_name.as_str(), session.last_name.as_str()), ("Sarah", "Johnson"));

    let record = repo.find_by_id(session.user_id).await.unwrap();
    assert_eq!(record.session(), session);
}

#[tokio::test]
async fn login_rejects_directory_user_without_password() {
    let (_, backend) = backend();
    let err = backend.login("john.doe@example.com", "").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn register_then_login() {
    let (_, backend) = backend();
    let msg = backend.register(&registration("ada@example.com", Role::Learner)).await.unwrap();
    assert_eq!(msg.message, "Registration successful");
    let response = backend.login("ada@example.com", "pw123456").await.unwrap();
    assert_eq!(response.user.user_id, 7);
    assert_eq!(response.user.role, Role::Learner);
}

#[tokio::test]
async fn register_rejects_admin_role() {
    let (repo, backend) = backend();
    let err = backend.register(&registration("boss@example.com", Role::Admin)).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(repo.len().await, 6);
}

#[tokio::test]
async fn register_rejects_malformed_email() {
    let (_, backend) = backend();
    for email in ["", "no-at-sign", "@example.com", "a@b@c"] {
        let err = backend.register(&registration(email, Role::Learner)).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)), "{email:?}");
    }
}

#[tokio::test]
async fn refresh_maps_token_back_to_user() {
    let (_, backend) = backend();
    let response = backend.refresh_token("mock-refresh-token-1").await.unwrap();
    assert_eq!(response.access, "mock-access-token-1");
}

#[tokio::test]
async fn refresh_rejects_unknown_user() {
    let (_, backend) = backend();
    for token in ["mock-refresh-token-999", "garbage", ""] {
        let err = backend.refresh_token(token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken), "{token:?}");
    }
}

// =============================================================================
// password reset
// =============================================================================

#[tokio::test]
async fn reset_password_acknowledges_unknown_email() {
    let (_, backend) = backend();
    let known = backend.reset_password("admin@example.com").await.unwrap();
    let unknown = backend.reset_password("ghost@example.com").await.unwrap();
    assert_eq!(known, unknown);
}

#[tokio::test]
async fn reset_round_trip_changes_password() {
    let (_, backend) = backend();
    let token = backend.issue_reset_token("learner@example.com").await.unwrap();
    backend.confirm_reset_password(&token, "brand-new").await.unwrap();

    assert!(backend.login("learner@example.com", "learner123").await.is_err());
    assert!(backend.login("learner@example.com", "brand-new").await.is_ok());
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let (_, backend) = backend();
    let token = backend.issue_reset_token("admin@example.com").await.unwrap();
    backend.confirm_reset_password(&token, "first").await.unwrap();
    let err = backend.confirm_reset_password(&token, "second").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidResetToken));
}

#[tokio::test]
async fn issue_reset_token_unknown_email_is_none() {
    let (_, backend) = backend();
    assert!(backend.issue_reset_token("ghost@example.com").await.is_none());
}

#[tokio::test]
async fn confirm_reset_rejects_unknown_token() {
    let (_, backend) = backend();
    let err = backend.confirm_reset_password("deadbeef", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidResetToken));
}
