//! Auth backend that talks to the JSON auth API.
//!
//! Every call is a `POST` with a JSON body. A non-2xx answer is a failure
//! carrying the server's `detail` text, or a per-call fallback when the body
//! has none. Status codes that mean a known auth failure are mapped onto the
//! matching `AuthError` variant. Any other 4xx stays a client error
//! (`Validation`); only 5xx and transport failures become `NetworkOrServer`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::services::auth::{
    AuthBackend, AuthError, ConfirmResetRequest, LoginRequest, LoginResponse, MessageResponse, RefreshRequest,
    RefreshResponse, RegisterData, ResetPasswordRequest,
};

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B, fallback: &str) -> Result<T, (StatusCode, AuthError)>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| (StatusCode::BAD_GATEWAY, AuthError::NetworkOrServer(e.to_string())))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| fallback.to_owned());
            let err = if status.is_client_error() {
                AuthError::Validation(detail)
            } else {
                AuthError::NetworkOrServer(detail)
            };
            return Err((status, err));
        }

        resp.json::<T>()
            .await
            .map_err(|e| (status, AuthError::NetworkOrServer(e.to_string())))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let body = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        self.post("/auth/login/", &body, "Failed to login")
            .await
            .map_err(|(status, e)| match status {
                StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials,
                _ => e,
            })
    }

    async fn register(&self, data: &RegisterData) -> Result<MessageResponse, AuthError> {
        self.post("/auth/register/", data, "Failed to register")
            .await
            .map_err(|(status, e)| match status {
                StatusCode::CONFLICT => AuthError::UserExists,
                _ => e,
            })
    }

    async fn refresh_token(&self, refresh: &str) -> Result<RefreshResponse, AuthError> {
        let body = RefreshRequest { refresh: refresh.to_owned() };
        self.post("/auth/token/refresh/", &body, "Failed to refresh token")
            .await
            .map_err(|(status, e)| match status {
                StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST => AuthError::InvalidRefreshToken,
                _ => e,
            })
    }

    async fn reset_password(&self, email: &str) -> Result<MessageResponse, AuthError> {
        let body = ResetPasswordRequest { email: email.to_owned() };
        self.post("/auth/reset-password/", &body, "Failed to request password reset")
            .await
            .map_err(|(_, e)| e)
    }

    async fn confirm_reset_password(&self, token: &str, password: &str) -> Result<MessageResponse, AuthError> {
        let body = ConfirmResetRequest { token: token.to_owned(), password: password.to_owned() };
        self.post("/auth/reset-password/confirm/", &body, "Failed to reset password")
            .await
            .map_err(|(status, e)| match status {
                StatusCode::BAD_REQUEST => AuthError::InvalidResetToken,
                _ => e,
            })
    }
}

#[cfg(test)]
#[path = "http_auth_test.rs"]
mod tests;
