//! Per-browser session context.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page handlers build one `SessionContext` per request, hydrate it from the
//! cookie token store, and call its actions. Each action delegates to the
//! `AuthClient` and returns the path the browser should be sent to next.
//!
//! Hydration is optimistic: a stored access token is taken as proof of an
//! authenticated session, with the role read from the role tag. The user
//! record itself is only known after an explicit login.

use crate::services::auth::{AuthClient, AuthError, RegisterData};
use crate::token_store::TokenStore;
use crate::types::{Role, Session};

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Authenticated {
        /// `None` when hydrated from stored tokens rather than a login.
        user: Option<Session>,
        role: Role,
    },
    Unauthenticated,
}

#[derive(Clone)]
pub struct SessionContext {
    auth: AuthClient,
    state: SessionState,
}

impl SessionContext {
    #[must_use]
    pub fn new(auth: AuthClient) -> Self {
        Self { auth, state: SessionState::Loading }
    }

    /// Leave `Loading` based on what the store holds.
    pub fn hydrate(&mut self, store: &dyn TokenStore) {
        self.state = if store.is_authenticated() {
            SessionState::Authenticated { user: None, role: store.role().unwrap_or(Role::Learner) }
        } else {
            SessionState::Unauthenticated
        };
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    #[must_use]
    pub fn user(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated { user, .. } => user.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self.state {
            SessionState::Authenticated { role, .. } => Some(role),
            _ => None,
        }
    }

    /// Log in and return the role dashboard to redirect to.
    ///
    /// Logging in replaces whatever session the store held before.
    pub async fn login(
        &mut self,
        store: &mut dyn TokenStore,
        email: &str,
        password: &str,
    ) -> Result<&'static str, AuthError> {
        let session = self.auth.login(store, email, password).await?;
        let target = session.role.dashboard_path();
        self.state = SessionState::Authenticated { role: session.role, user: Some(session) };
        Ok(target)
    }

    /// Register and return the login page to redirect to.
    pub async fn register(&mut self, data: &RegisterData) -> Result<&'static str, AuthError> {
        self.auth.register(data).await?;
        Ok(LOGIN_PATH)
    }

    pub fn logout(&mut self, store: &mut dyn TokenStore) -> &'static str {
        self.auth.logout(store);
        self.state = SessionState::Unauthenticated;
        LOGIN_PATH
    }

    /// Drop the session after a refresh that cannot be recovered from.
    pub fn refresh_failed(&mut self, store: &mut dyn TokenStore) -> &'static str {
        tracing::info!("session ended after failed token refresh");
        self.logout(store)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
