//! In-memory auth backend over the user repository.
//!
//! DESIGN
//! ======
//! Tokens are not signed: `mock-access-token-{id}` and
//! `mock-refresh-token-{id}` carry the user id in their last `-` segment and
//! refresh maps that id back to a user. Reset tokens are random and stored
//! only as SHA-256 hashes; confirming one removes it.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::services::auth::{AuthBackend, AuthError, LoginResponse, MessageResponse, RefreshResponse, RegisterData};
use crate::services::users::{NewUser, UserError, UserRepository};
use crate::types::Role;

const RESET_ACK: &str = "If an account exists with this email, you'll receive a password reset link.";

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

#[must_use]
pub fn access_token_for(user_id: u64) -> String {
    format!("mock-access-token-{user_id}")
}

#[must_use]
pub fn refresh_token_for(user_id: u64) -> String {
    format!("mock-refresh-token-{user_id}")
}

/// User id carried by a mock token, if it parses as one.
#[must_use]
pub fn token_user_id(token: &str) -> Option<u64> {
    token.rsplit('-').next()?.parse().ok()
}

fn validate_registration(data: &RegisterData) -> Result<(), AuthError> {
    let email = data.email.trim();
    let mut parts = email.split('@');
    let well_formed = matches!((parts.next(), parts.next(), parts.next()), (Some(local), Some(domain), None)
        if !local.is_empty() && !domain.is_empty());
    if !well_formed {
        return Err(AuthError::Validation("Enter a valid email address".into()));
    }
    if data.password.is_empty() {
        return Err(AuthError::Validation("Password is required".into()));
    }
    if data.role == Role::Admin {
        return Err(AuthError::Validation("Only learner and tutor accounts can register".into()));
    }
    Ok(())
}

pub struct MockAuthBackend {
    users: Arc<dyn UserRepository>,
    /// Reset-token hash → user id.
    reset_tokens: RwLock<HashMap<String, u64>>,
}

impl MockAuthBackend {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users, reset_tokens: RwLock::new(HashMap::new()) }
    }

    /// Issue a single-use reset token for a known email.
    pub async fn issue_reset_token(&self, email: &str) -> Option<String> {
        let user = self.users.find_by_email(email.trim()).await?;
        let token = generate_token();
        self.reset_tokens.write().await.insert(hash_token(&token), user.id);
        Some(token)
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .filter(|u| u.password.as_deref() == Some(password))
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(LoginResponse { access: access_token_for(user.id), refresh: refresh_token_for(user.id), user: user.session() })
    }

    async fn register(&self, data: &RegisterData) -> Result<MessageResponse, AuthError> {
        validate_registration(data)?;
        let new_user = NewUser {
            email: data.email.trim().to_owned(),
            password: data.password.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            role: data.role,
            joined: time::OffsetDateTime::now_utc().date().to_string(),
        };
        match self.users.insert(new_user).await {
            Ok(_) => Ok(MessageResponse::new("Registration successful")),
            Err(UserError::EmailTaken(_)) => Err(AuthError::UserExists),
            Err(e) => Err(AuthError::NetworkOrServer(e.to_string())),
        }
    }

    async fn refresh_token(&self, refresh: &str) -> Result<RefreshResponse, AuthError> {
        let user_id = token_user_id(refresh).ok_or(AuthError::InvalidRefreshToken)?;
        let user = self.users.find_by_id(user_id).await.ok_or(AuthError::InvalidRefreshToken)?;
        Ok(RefreshResponse { access: access_token_for(user.id) })
    }

    async fn reset_password(&self, email: &str) -> Result<MessageResponse, AuthError> {
        // No mailer in the mock; the token only reaches the debug log.
        if let Some(token) = self.issue_reset_token(email).await {
            tracing::debug!(%token, "password reset token issued");
        }
        Ok(MessageResponse::new(RESET_ACK))
    }

    async fn confirm_reset_password(&self, token: &str, password: &str) -> Result<MessageResponse, AuthError> {
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".into()));
        }
        let user_id = self
            .reset_tokens
            .write()
            .await
            .remove(&hash_token(token.trim()))
            .ok_or(AuthError::InvalidResetToken)?;
        self.users
            .set_password(user_id, password)
            .await
            .map_err(|_| AuthError::InvalidResetToken)?;
        tracing::info!(user_id, "password reset");
        Ok(MessageResponse::new("Password has been reset"))
    }
}

#[cfg(test)]
#[path = "mock_auth_test.rs"]
mod tests;
