//! Authenticated JSON client for the LMS API.
//!
//! DESIGN
//! ======
//! Requests carry `Authorization: Bearer <access>` when the store holds a
//! token. A 401 triggers at most one refresh followed by one retry. If the
//! refresh fails, or the retry is rejected again, the store is cleared and
//! the call fails with `SessionExpired`; the caller sends the user to login.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::services::auth::{AuthClient, AuthError};
use crate::token_store::TokenStore;

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthClient,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, auth: AuthClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http: reqwest::Client::new(), base_url, auth }
    }

    async fn send<B>(
        &self,
        store: &dyn TokenStore,
        method: &Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, AuthError>
    where
        B: Serialize + Sync,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let mut req = self.http.request(method.clone(), &url);
        if let Some(token) = store.access_token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send()
            .await
            .map_err(|e| AuthError::NetworkOrServer(e.to_string()))
    }

    /// Send a request, refreshing the access token once on a 401.
    pub async fn request<B, T>(
        &self,
        store: &mut dyn TokenStore,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, AuthError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut resp = self.send(store, &method, endpoint, body).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            let Some(refresh) = store.refresh_token() else {
                self.auth.logout(store);
                return Err(AuthError::AuthenticationRequired);
            };
            if self.auth.refresh_token(store, &refresh).await.is_err() {
                self.auth.logout(store);
                return Err(AuthError::SessionExpired);
            }
            resp = self.send(store, &method, endpoint, body).await?;
            if resp.status() == StatusCode::UNAUTHORIZED {
                tracing::warn!(%endpoint, "request rejected after token refresh");
                self.auth.logout(store);
                return Err(AuthError::SessionExpired);
            }
        }

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            return Err(AuthError::NetworkOrServer(
                detail.unwrap_or_else(|| format!("API request failed with status {}", status.as_u16())),
            ));
        }

        resp.json::<T>()
            .await
            .map_err(|e| AuthError::NetworkOrServer(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, store: &mut dyn TokenStore, endpoint: &str) -> Result<T, AuthError> {
        self.request::<(), T>(store, Method::GET, endpoint, None).await
    }

    pub async fn post<B, T>(&self, store: &mut dyn TokenStore, endpoint: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.request(store, Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<B, T>(&self, store: &mut dyn TokenStore, endpoint: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.request(store, Method::PUT, endpoint, Some(body)).await
    }

    pub async fn patch<B, T>(&self, store: &mut dyn TokenStore, endpoint: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.request(store, Method::PATCH, endpoint, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, store: &mut dyn TokenStore, endpoint: &str) -> Result<T, AuthError> {
        self.request::<(), T>(store, Method::DELETE, endpoint, None).await
    }
}

#[cfg(test)]
#[path = "api_client_test.rs"]
mod tests;
