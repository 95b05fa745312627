//! Auth page routes: login, registration, password reset and session actions.
//!
//! Form posts go through a per-request `SessionContext` backed by the cookie
//! token store, so cookie writes land in the response jar.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::services::auth::{AuthError, ConfirmResetRequest, LoginRequest, MessageResponse, RegisterData, ResetPasswordRequest};
use crate::session::LOGIN_PATH;
use crate::state::AppState;
use crate::token_store::TokenStore;

/// What a form page needs to render: its title, where it posts and which
/// fields it submits.
#[derive(Debug, Clone, Serialize)]
pub struct FormPage {
    pub title: &'static str,
    pub action: &'static str,
    pub fields: &'static [&'static str],
}

/// `GET /auth/login`
pub async fn login_page() -> Json<FormPage> {
    Json(FormPage { title: "Sign in", action: "/auth/login", fields: &["email", "password"] })
}

/// `GET /auth/register`
pub async fn register_page() -> Json<FormPage> {
    Json(FormPage {
        title: "Create an account",
        action: "/auth/register",
        fields: &["email", "password", "first_name", "last_name", "role"],
    })
}

/// `GET /auth/reset-password`
pub async fn reset_password_page() -> Json<FormPage> {
    Json(FormPage { title: "Reset password", action: "/auth/reset-password", fields: &["email"] })
}

/// `POST /auth/login`: store tokens and send the browser to its dashboard.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginRequest>,
) -> Result<(CookieJar, Redirect), AuthError> {
    let mut store = state.token_store(jar);
    let mut session = state.session(&store);
    let target = session.login(&mut store, &form.email, &form.password).await?;
    Ok((store.into_jar(), Redirect::to(target)))
}

/// `POST /auth/register`
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterData>) -> Result<Redirect, AuthError> {
    let mut session = state.session(&state.token_store(CookieJar::new()));
    let target = session.register(&form).await?;
    Ok(Redirect::to(target))
}

/// `POST /auth/reset-password`
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    Ok(Json(state.auth.reset_password(&form.email).await?))
}

/// `POST /auth/reset-password/confirm`
pub async fn confirm_reset_password(
    State(state): State<AppState>,
    Form(form): Form<ConfirmResetRequest>,
) -> Result<Redirect, AuthError> {
    state.auth.confirm_reset_password(&form.token, &form.password).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

/// `POST /auth/logout`
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut store = state.token_store(jar);
    let target = state.session(&store).logout(&mut store);
    (store.into_jar(), Redirect::to(target))
}

/// `POST /auth/refresh`: swap the stored refresh token for a new access
/// token. A failed refresh ends the session.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let mut store = state.token_store(jar);
    let mut session = state.session(&store);

    let Some(refresh) = store.refresh_token() else {
        let target = session.refresh_failed(&mut store);
        return (store.into_jar(), Redirect::to(target)).into_response();
    };

    match state.auth.refresh_token(&mut store, &refresh).await {
        Ok(_) => (store.into_jar(), StatusCode::NO_CONTENT).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "token refresh rejected");
            let target = session.refresh_failed(&mut store);
            (store.into_jar(), Redirect::to(target)).into_response()
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
