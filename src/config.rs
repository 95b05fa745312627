//! Process configuration loaded from the environment.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` through `dotenvy` and then reads everything here once.
//! Missing or malformed values fall back to defaults so a bare checkout runs
//! against the in-process mock backend.

use std::str::FromStr;

pub const APP_NAME: &str = "Edu-LMS";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparseable env value");
            default
        }),
        Err(_) => default,
    }
}

/// Which auth backend the page-level session actions talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthBackendKind {
    /// In-process user table, no network.
    Mock,
    /// JSON API at `Config::api_url`.
    Http,
}

impl FromStr for AuthBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown auth backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL for the auth API, without a trailing slash.
    pub api_url: String,
    pub auth_backend: AuthBackendKind,
    /// Marks session cookies `Secure`.
    pub cookie_secure: bool,
}

impl Config {
    /// Read `PORT`, `LMS_API_URL`, `LMS_AUTH_BACKEND` and `COOKIE_SECURE`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = std::env::var("LMS_API_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        let auth_backend = match std::env::var("LMS_AUTH_BACKEND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "falling back to mock auth backend");
                AuthBackendKind::Mock
            }),
            Err(_) => AuthBackendKind::Mock,
        };

        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            api_url,
            auth_backend,
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_url: DEFAULT_API_URL.to_owned(),
            auth_backend: AuthBackendKind::Mock,
            cookie_secure: false,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
