//! JSON auth API served from the in-process mock backend.
//!
//! Mirrors the endpoints `HttpAuthBackend` calls, so a second instance can
//! point `LMS_API_URL` at this one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::services::auth::{
    AuthBackend, AuthError, ConfirmResetRequest, LoginRequest, LoginResponse, MessageResponse, RefreshRequest,
    RefreshResponse, RegisterData, ResetPasswordRequest,
};
use crate::state::AppState;

/// `POST /api/auth/login/`
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
    let response = state.mock_auth.login(&body.email, &body.password).await?;
    tracing::info!(user_id = response.user.user_id, "api login");
    Ok(Json(response))
}

/// `POST /api/auth/register/`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterData>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let response = state.mock_auth.register(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/token/refresh/`
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AuthError> {
    Ok(Json(state.mock_auth.refresh_token(&body.refresh).await?))
}

/// `POST /api/auth/reset-password/`
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    Ok(Json(state.mock_auth.reset_password(&body.email).await?))
}

/// `POST /api/auth/reset-password/confirm/`
pub async fn confirm_reset_password(
    State(state): State<AppState>,
    Json(body): Json<ConfirmResetRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    Ok(Json(state.mock_auth.confirm_reset_password(&body.token, &body.password).await?))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
