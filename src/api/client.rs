//! HTTP client for the storefront API.
//!
//! One place owns bearer injection, the request timeout, response caching,
//! and status-to-error classification; the typed API surfaces above it only
//! ever see [`ApiError`] kinds.

use std::sync::Arc;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{
    api::{
        cache::ResponseCache,
        errors::{ApiError, ValidationBody},
    },
    auth::credentials::CredentialStore,
    config::ClientConfig,
};

/// Cache policy for a GET request.
///
/// Mutable authenticated resources (cart, user records) are always
/// [`Freshness::Bypass`]: their freshness is a property of the read, not of
/// call-site invalidation discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Serve from the GET cache when fresh; store the response on miss.
    Cached,

    /// Always hit the network.
    Bypass,
}

/// Typed HTTP transport shared by every API surface.
pub struct ApiClient {
    base_url: String,
    http: Client,
    credentials: Arc<dyn CredentialStore>,
    cache: ResponseCache,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            credentials,
            cache: ResponseCache::new(config.cache_ttl()),
        })
    }

    /// GET `path` and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        freshness: Freshness,
    ) -> Result<T, ApiError> {
        let url = self.url(path);

        if freshness == Freshness::Cached {
            if let Some(value) = self.cache.get(&url) {
                debug!(%url, "serving cached response");
                return from_value(value);
            }
        }

        let response = self.send(self.http.get(&url)).await?;
        let value: Value = response.json().await?;

        if freshness == Freshness::Cached {
            self.cache.put(url, value.clone());
        }

        from_value(value)
    }

    /// POST a JSON body to `path` and deserialize the response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;

        Ok(response.json().await?)
    }

    /// PUT a JSON body to `path` and deserialize the response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.put(self.url(path)).json(body)).await?;

        Ok(response.json().await?)
    }

    /// DELETE `path` and deserialize the response body.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.delete(self.url(path))).await?;

        Ok(response.json().await?)
    }

    /// DELETE `path`, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.http.delete(self.url(path))).await?;

        Ok(())
    }

    /// POST a multipart form (admin image uploads) and deserialize the
    /// response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.http.post(self.url(path)).multipart(form))
            .await?;

        Ok(response.json().await?)
    }

    /// Evict the cache entry for `path`.
    pub fn invalidate(&self, path: &str) {
        self.cache.invalidate(&self.url(path));
    }

    /// Evict every cache entry under `path`.
    pub fn invalidate_prefix(&self, path: &str) {
        self.cache.invalidate_prefix(&self.url(path));
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;

        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            // Expired or revoked token: drop it so the app falls back to the
            // logged-out state instead of replaying a dead credential.
            self.credentials.clear();
            return Err(ApiError::Unauthenticated);
        }

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.json::<ValidationBody>().await.unwrap_or_default();
            return Err(ApiError::Validation(body.first_message()));
        }

        Err(ApiError::from_status(status))
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|error| ApiError::UnexpectedResponse(error.to_string()))
}
