//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two surfaces share one Axum router. Page routes (`/`, `/auth/*`,
//! `/dashboard/*`) sit behind the route guard and answer with the view
//! data each page renders. The JSON auth API under `/api/auth` is served by
//! the in-process mock backend and is not guarded.

pub mod api;
pub mod auth;
pub mod pages;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::services::auth::AuthError;
use crate::services::users::UserError;
use crate::state::AppState;

/// Error body shared by every JSON failure: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub(crate) fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(ErrorBody { detail: detail.into() })).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = match self {
            UserError::NotFound(_) => StatusCode::NOT_FOUND,
            UserError::EmailTaken(_) => StatusCode::CONFLICT,
        };
        error_response(status, self.to_string())
    }
}

/// Guarded page routes.
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::landing))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/register", get(auth::register_page).post(auth::register))
        .route("/auth/reset-password", get(auth::reset_password_page).post(auth::reset_password))
        .route("/auth/reset-password/confirm", post(auth::confirm_reset_password))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/dashboard", get(pages::dashboard_home))
        .route("/dashboard/learner", get(pages::learner_dashboard))
        .route("/dashboard/tutor", get(pages::tutor_dashboard))
        .route("/dashboard/admin", get(pages::admin_dashboard))
        .route("/dashboard/admin/users", get(pages::user_management))
        .route("/dashboard/admin/users/{id}", get(pages::user_detail))
        .route("/dashboard/learner/profile", get(pages::learner_profile))
        .route("/dashboard/tutor/profile", get(pages::tutor_profile))
        .route("/dashboard/profile", get(pages::profile).patch(pages::update_profile))
        .route("/dashboard/profile/preferences", patch(pages::update_preferences))
        .route("/dashboard/courses", get(pages::courses))
        .route("/dashboard/courses/{id}", get(pages::course_detail))
        .route_layer(middleware::from_fn(guard::enforce))
}

/// Auth API backed by the mock user table.
fn api_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/login/", post(api::login))
        .route("/api/auth/register/", post(api::register))
        .route("/api/auth/reset-password/", post(api::reset_password))
        .route("/api/auth/reset-password/confirm/", post(api::confirm_reset_password))
        .route("/api/auth/token/refresh/", post(api::refresh_token))
        .layer(cors)
}

pub fn app(state: AppState) -> Router {
    page_routes()
        .merge(api_routes())
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
