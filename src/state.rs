//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Every service is constructed once here and shared behind `Arc`; nothing
//! lives in module-level statics. The user table is owned by the repository
//! that both the mock auth backend and the user service read.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;

use crate::config::{AuthBackendKind, Config};
use crate::services::auth::{AuthBackend, AuthClient};
use crate::services::courses::CourseCatalog;
use crate::services::http_auth::HttpAuthBackend;
use crate::services::mock_auth::MockAuthBackend;
use crate::services::users::{InMemoryUserRepository, UserRepository, UserService};
use crate::session::SessionContext;
use crate::token_store::{CookieTokenStore, TokenStore};

/// Shared application state. Clone is required by Axum; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Client used by page-level session actions (mock or HTTP backend).
    pub auth: AuthClient,
    /// In-process backend answering the `/api/auth` endpoints.
    pub mock_auth: Arc<MockAuthBackend>,
    pub users: UserService,
    pub courses: Arc<CourseCatalog>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::seeded());
        Self::with_repository(config, repo)
    }

    #[must_use]
    pub fn with_repository(config: Config, repo: Arc<dyn UserRepository>) -> Self {
        let mock_auth = Arc::new(MockAuthBackend::new(repo.clone()));
        let backend: Arc<dyn AuthBackend> = match config.auth_backend {
            AuthBackendKind::Mock => mock_auth.clone(),
            AuthBackendKind::Http => Arc::new(HttpAuthBackend::new(config.api_url.clone())),
        };
        Self {
            config: Arc::new(config),
            auth: AuthClient::new(backend),
            mock_auth,
            users: UserService::new(repo),
            courses: Arc::new(CourseCatalog::seeded()),
        }
    }

    #[must_use]
    pub fn token_store(&self, jar: CookieJar) -> CookieTokenStore {
        CookieTokenStore::new(jar, self.config.cookie_secure)
    }

    /// Session context already hydrated from `store`.
    #[must_use]
    pub fn session(&self, store: &dyn TokenStore) -> SessionContext {
        let mut session = SessionContext::new(self.auth.clone());
        session.hydrate(store);
        session
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
