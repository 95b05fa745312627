//! Page routes returning the view data each screen renders.

use axum::extract::{FromRef, FromRequestParts, Path, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::config::APP_NAME;
use crate::services::auth::AuthError;
use crate::services::courses::Course;
use crate::services::users::{
    LearnerDetails, Preferences, PreferencesPatch, ProfilePatch, RoleFilter, TutorDetails, UserError, UserRecord,
};
use crate::session::LOGIN_PATH;
use crate::state::AppState;
use crate::token_store::TokenStore;
use crate::types::Role;

const FEATURED_COURSES: usize = 3;

// =============================================================================
// VIEWER EXTRACTOR
// =============================================================================

/// The signed-in user as the session context sees them.
///
/// `role` comes from the role cookie; `user` is resolved from the access
/// token and is `None` when the token no longer maps to a known user.
pub struct Viewer {
    pub role: Role,
    pub user: Option<UserRecord>,
}

impl Viewer {
    fn require_user(self) -> Result<UserRecord, AuthError> {
        self.user.ok_or(AuthError::AuthenticationRequired)
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let store = app_state.token_store(CookieJar::from_headers(&parts.headers));
        let session = app_state.session(&store);
        let (Some(role), Some(token)) = (session.role(), store.access_token()) else {
            return Err(Redirect::to(LOGIN_PATH));
        };

        let user = app_state.users.current_user(&token).await;
        Ok(Self { role, user })
    }
}

// =============================================================================
// PUBLIC
// =============================================================================

#[derive(Debug, Serialize)]
pub struct Landing<'a> {
    pub app_name: &'static str,
    pub featured: Vec<&'a Course>,
}

/// `GET /`
pub async fn landing(State(state): State<AppState>) -> Response {
    let featured = state.courses.available().take(FEATURED_COURSES).collect();
    Json(Landing { app_name: APP_NAME, featured }).into_response()
}

// =============================================================================
// DASHBOARDS
// =============================================================================

/// `GET /dashboard`
pub async fn dashboard_home(viewer: Viewer) -> Redirect {
    Redirect::to(viewer.role.dashboard_path())
}

#[derive(Debug, Serialize)]
pub struct LearnerDashboard<'a> {
    pub user: Option<UserRecord>,
    pub enrolled: Vec<&'a Course>,
    pub recommended: Vec<&'a Course>,
}

/// `GET /dashboard/learner`
pub async fn learner_dashboard(State(state): State<AppState>, viewer: Viewer) -> Response {
    let view = LearnerDashboard {
        user: viewer.user,
        enrolled: state.courses.enrolled().collect(),
        recommended: state.courses.available().collect(),
    };
    Json(view).into_response()
}

#[derive(Debug, Serialize)]
pub struct TutorDashboard<'a> {
    pub user: Option<UserRecord>,
    pub courses: Vec<&'a Course>,
}

/// `GET /dashboard/tutor`
pub async fn tutor_dashboard(State(state): State<AppState>, viewer: Viewer) -> Response {
    let name = viewer.user.as_ref().map(UserRecord::full_name).unwrap_or_default();
    let view = TutorDashboard { courses: state.courses.taught_by(&name).collect(), user: viewer.user };
    Json(view).into_response()
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserCounts {
    pub total: usize,
    pub learners: usize,
    pub tutors: usize,
    pub admins: usize,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub user: Option<UserRecord>,
    pub users: UserCounts,
    pub courses: usize,
}

/// `GET /dashboard/admin`
pub async fn admin_dashboard(State(state): State<AppState>, viewer: Viewer) -> Json<AdminDashboard> {
    let mut counts = UserCounts::default();
    for user in state.users.all_users().await {
        counts.total += 1;
        match user.role {
            Role::Learner => counts.learners += 1,
            Role::Tutor => counts.tutors += 1,
            Role::Admin => counts.admins += 1,
        }
    }
    let courses = state.courses.enrolled().count() + state.courses.available().count();
    Json(AdminDashboard { user: viewer.user, users: counts, courses })
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub role: RoleFilter,
}

/// `GET /dashboard/admin/users?q=&role=`
pub async fn user_management(State(state): State<AppState>, Query(query): Query<UserQuery>) -> Json<Vec<UserRecord>> {
    Json(state.users.search(&query.q, query.role).await)
}

/// `GET /dashboard/admin/users/{id}`
pub async fn user_detail(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<UserRecord>, UserError> {
    state.users.user_by_id(id).await.map(Json).ok_or(UserError::NotFound(id))
}

/// `GET /dashboard/learner/profile`
pub async fn learner_profile(State(state): State<AppState>, viewer: Viewer) -> Result<Json<LearnerDetails>, Response> {
    let user = viewer.require_user().map_err(IntoResponse::into_response)?;
    match state.users.learner_profile(user.id).await {
        Some(details) => Ok(Json(details)),
        None => Err(UserError::NotFound(user.id).into_response()),
    }
}

/// `GET /dashboard/tutor/profile`
pub async fn tutor_profile(State(state): State<AppState>, viewer: Viewer) -> Result<Json<TutorDetails>, Response> {
    let user = viewer.require_user().map_err(IntoResponse::into_response)?;
    match state.users.tutor_profile(user.id).await {
        Some(details) => Ok(Json(details)),
        None => Err(UserError::NotFound(user.id).into_response()),
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// `GET /dashboard/profile`
pub async fn profile(viewer: Viewer) -> Result<Json<UserRecord>, AuthError> {
    Ok(Json(viewer.require_user()?))
}

/// `PATCH /dashboard/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserRecord>, Response> {
    let user = viewer.require_user().map_err(IntoResponse::into_response)?;
    let updated = state
        .users
        .update_profile(user.id, &patch)
        .await
        .map_err(UserError::into_response)?;
    Ok(Json(updated))
}

/// `PATCH /dashboard/profile/preferences`
pub async fn update_preferences(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<Preferences>, Response> {
    let user = viewer.require_user().map_err(IntoResponse::into_response)?;
    let preferences = state
        .users
        .update_preferences(user.id, patch)
        .await
        .map_err(UserError::into_response)?;
    Ok(Json(preferences))
}

// =============================================================================
// COURSES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CourseList<'a> {
    pub enrolled: Vec<&'a Course>,
    pub available: Vec<&'a Course>,
}

/// `GET /dashboard/courses`
pub async fn courses(State(state): State<AppState>) -> Response {
    let view = CourseList { enrolled: state.courses.enrolled().collect(), available: state.courses.available().collect() };
    Json(view).into_response()
}

/// `GET /dashboard/courses/{id}`
pub async fn course_detail(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    match state.courses.by_id(id) {
        Some(course) => Json(course).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Course {id} not found")),
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
