//! Auth client: login, registration, token refresh and password reset.
//!
//! ARCHITECTURE
//! ============
//! `AuthBackend` is the seam between the session layer and whoever owns the
//! user table: `MockAuthBackend` answers from memory, `HttpAuthBackend`
//! posts to the JSON auth API. `AuthClient` wraps a backend and applies the
//! token-store side effects, so both backends persist credentials the same
//! way. Failed calls never write to the store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::token_store::TokenStore;
use crate::types::{Role, Session, TokenPair};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User already exists")]
    UserExists,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Invalid or expired reset token")]
    InvalidResetToken,
    #[error("Session expired. Please login again.")]
    SessionExpired,
    #[error("Authentication required. Please login.")]
    AuthenticationRequired,
    #[error("{0}")]
    Validation(String),
    /// Transport failure or a server error, carrying the server's message.
    #[error("{0}")]
    NetworkOrServer(String),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::InvalidRefreshToken
            | Self::SessionExpired
            | Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::UserExists => StatusCode::CONFLICT,
            Self::InvalidResetToken | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NetworkOrServer(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: Session,
}

impl LoginResponse {
    #[must_use]
    pub fn tokens(&self) -> TokenPair {
        TokenPair { access: self.access.clone(), refresh: self.refresh.clone() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmResetRequest {
    pub token: String,
    pub password: String,
}

// =============================================================================
// BACKEND
// =============================================================================

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError>;

    async fn register(&self, data: &RegisterData) -> Result<MessageResponse, AuthError>;

    async fn refresh_token(&self, refresh: &str) -> Result<RefreshResponse, AuthError>;

    async fn reset_password(&self, email: &str) -> Result<MessageResponse, AuthError>;

    async fn confirm_reset_password(&self, token: &str, password: &str) -> Result<MessageResponse, AuthError>;
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct AuthClient {
    backend: Arc<dyn AuthBackend>,
}

impl AuthClient {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    /// Authenticate and persist the token pair with the user's role.
    pub async fn login(&self, store: &mut dyn TokenStore, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = match self.backend.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(error = %e, "login rejected");
                return Err(e);
            }
        };
        store.save(&response.tokens(), response.user.role);
        tracing::info!(user_id = response.user.user_id, role = %response.user.role, "login succeeded");
        Ok(response.user)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<MessageResponse, AuthError> {
        let response = self.backend.register(data).await?;
        tracing::info!(role = %data.role, "user registered");
        Ok(response)
    }

    /// Mint a new access token. The store is only touched on success.
    pub async fn refresh_token(&self, store: &mut dyn TokenStore, refresh: &str) -> Result<RefreshResponse, AuthError> {
        let response = match self.backend.refresh_token(refresh).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                return Err(e);
            }
        };
        store.set_access_token(&response.access);
        Ok(response)
    }

    pub fn logout(&self, store: &mut dyn TokenStore) {
        store.clear();
    }

    pub async fn reset_password(&self, email: &str) -> Result<MessageResponse, AuthError> {
        self.backend.reset_password(email).await
    }

    pub async fn confirm_reset_password(&self, token: &str, password: &str) -> Result<MessageResponse, AuthError> {
        self.backend.confirm_reset_password(token, password).await
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
