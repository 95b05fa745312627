//! Client-side persistence for session credentials.
//!
//! DESIGN
//! ======
//! Access token, refresh token and role tag travel together: `save` writes
//! all three and `clear` removes all three. Expiry is whatever the storage
//! mechanism enforces (cookie max-age); stored tokens are never inspected.
//!
//! Two stores exist: `CookieTokenStore` wraps the request's cookie jar and
//! is what page handlers use; `MemoryTokenStore` is the key/value variant
//! with no expiry, used by API callers that are not browsers.

use std::collections::HashMap;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::types::{Role, TokenPair};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const ROLE_KEY: &str = "userRole";

const ACCESS_TOKEN_MAX_AGE: Duration = Duration::seconds(3600);
const REFRESH_TOKEN_MAX_AGE: Duration = Duration::seconds(2_592_000);

pub trait TokenStore: Send {
    /// Persist both tokens and the role tag.
    fn save(&mut self, tokens: &TokenPair, role: Role);

    /// Replace the access token only. Used after a refresh.
    fn set_access_token(&mut self, access: &str);

    /// Remove tokens and role tag. Safe to call when already empty.
    fn clear(&mut self);

    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Raw role tag as stored, which may not name a known role.
    fn role_tag(&self) -> Option<String>;

    fn role(&self) -> Option<Role> {
        self.role_tag().and_then(|tag| tag.parse().ok())
    }

    fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_owned()) }
}

// =============================================================================
// COOKIE STORE
// =============================================================================

/// Token store backed by the request cookie jar.
///
/// Mutations accumulate in the jar; hand it back with `into_jar` so the
/// response carries the `Set-Cookie` headers.
#[derive(Debug, Clone)]
pub struct CookieTokenStore {
    jar: CookieJar,
    secure: bool,
}

impl CookieTokenStore {
    #[must_use]
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    #[must_use]
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(max_age)
            .build()
    }

    fn put(&mut self, cookie: Cookie<'static>) {
        let jar = std::mem::replace(&mut self.jar, CookieJar::new());
        self.jar = jar.add(cookie);
    }

    fn value(&self, name: &str) -> Option<String> {
        self.jar.get(name).and_then(|c| non_empty(c.value()))
    }
}

impl TokenStore for CookieTokenStore {
    fn save(&mut self, tokens: &TokenPair, role: Role) {
        let access = self.build(ACCESS_TOKEN_KEY, tokens.access.clone(), ACCESS_TOKEN_MAX_AGE);
        let refresh = self.build(REFRESH_TOKEN_KEY, tokens.refresh.clone(), REFRESH_TOKEN_MAX_AGE);
        let role = self.build(ROLE_KEY, role.as_str().to_owned(), REFRESH_TOKEN_MAX_AGE);
        self.put(access);
        self.put(refresh);
        self.put(role);
    }

    fn set_access_token(&mut self, access: &str) {
        let cookie = self.build(ACCESS_TOKEN_KEY, access.to_owned(), ACCESS_TOKEN_MAX_AGE);
        self.put(cookie);
    }

    fn clear(&mut self) {
        let mut jar = std::mem::replace(&mut self.jar, CookieJar::new());
        for name in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY] {
            jar = jar.remove(Cookie::build((name, "")).path("/"));
        }
        self.jar = jar;
    }

    fn access_token(&self) -> Option<String> {
        self.value(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        self.value(REFRESH_TOKEN_KEY)
    }

    fn role_tag(&self) -> Option<String> {
        self.value(ROLE_KEY)
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Key/value token store with no expiry.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    entries: HashMap<&'static str, String>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn value(&self, key: &str) -> Option<String> {
        self.entries.get(key).and_then(|v| non_empty(v))
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&mut self, tokens: &TokenPair, role: Role) {
        self.entries.insert(ACCESS_TOKEN_KEY, tokens.access.clone());
        self.entries.insert(REFRESH_TOKEN_KEY, tokens.refresh.clone());
        self.entries.insert(ROLE_KEY, role.as_str().to_owned());
    }

    fn set_access_token(&mut self, access: &str) {
        self.entries.insert(ACCESS_TOKEN_KEY, access.to_owned());
    }

    fn clear(&mut self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY] {
            self.entries.remove(key);
        }
    }

    fn access_token(&self) -> Option<String> {
        self.value(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        self.value(REFRESH_TOKEN_KEY)
    }

    fn role_tag(&self) -> Option<String> {
        self.value(ROLE_KEY)
    }
}

#[cfg(test)]
#[path = "token_store_test.rs"]
mod tests;
