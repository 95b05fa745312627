//! Per-navigation access control for page routes.
//!
//! DESIGN
//! ======
//! `evaluate` is a pure function of the request path and the stored
//! credentials. Paths are classified against one explicit table:
//!
//! | Path                                                   | Access              |
//! |--------------------------------------------------------|---------------------|
//! | `/`, `/auth/logout`, `/auth/refresh`                   | public              |
//! | `/auth/login`, `/auth/register`, `/auth/reset-password` | auth page (public)  |
//! | `/dashboard/admin`                                     | admin               |
//! | `/dashboard/tutor`                                     | tutor               |
//! | `/dashboard/learner`                                   | learner             |
//! | anything else                                          | any signed-in user  |
//!
//! Entries match the exact path or any path below it on a `/` boundary, so
//! `/dashboard/admin/users` is admin-only while `/dashboard/administer` is
//! not. The check is advisory: it trusts the client-held role tag.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::session::LOGIN_PATH;
use crate::token_store::{CookieTokenStore, TokenStore};
use crate::types::Role;

const PUBLIC_PATHS: &[&str] = &["/", "/auth/logout", "/auth/refresh"];
const AUTH_PAGES: &[&str] = &["/auth/login", "/auth/register", "/auth/reset-password"];
const ROLE_SCOPES: &[(&str, Role)] = &[
    ("/dashboard/admin", Role::Admin),
    ("/dashboard/tutor", Role::Tutor),
    ("/dashboard/learner", Role::Learner),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    AuthPage,
    SignedIn,
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    RedirectTo(String),
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

#[must_use]
pub fn classify(path: &str) -> Access {
    if PUBLIC_PATHS.iter().any(|p| *p == path) {
        return Access::Public;
    }
    if AUTH_PAGES.iter().any(|p| under(path, p)) {
        return Access::AuthPage;
    }
    if let Some((_, role)) = ROLE_SCOPES.iter().find(|(p, _)| under(path, p)) {
        return Access::Role(*role);
    }
    Access::SignedIn
}

/// Decide whether a navigation may continue.
#[must_use]
pub fn evaluate(path: &str, store: &dyn TokenStore) -> GuardDecision {
    let access = classify(path);
    let signed_in = store.is_authenticated();
    // Missing or unrecognised role tags fall back to the learner dashboard.
    let role = store.role().unwrap_or(Role::Learner);

    match access {
        Access::Public => GuardDecision::Continue,
        Access::AuthPage if signed_in => GuardDecision::RedirectTo(role.dashboard_path().to_owned()),
        Access::AuthPage => GuardDecision::Continue,
        Access::SignedIn | Access::Role(_) if !signed_in => GuardDecision::RedirectTo(LOGIN_PATH.to_owned()),
        Access::Role(required) if required != role => GuardDecision::RedirectTo(role.dashboard_path().to_owned()),
        Access::SignedIn | Access::Role(_) => GuardDecision::Continue,
    }
}

/// Axum middleware applying `evaluate` to every request it wraps.
pub async fn enforce(jar: CookieJar, request: Request, next: Next) -> Response {
    let store = CookieTokenStore::new(jar, false);
    let path = request.uri().path().to_owned();
    match evaluate(&path, &store) {
        GuardDecision::Continue => next.run(request).await,
        GuardDecision::RedirectTo(target) => {
            tracing::debug!(%path, %target, "route guard redirect");
            Redirect::to(&target).into_response()
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
