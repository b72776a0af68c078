//! API channel: an authenticated or anonymous HTTP client plus per-resource
//! operation wrappers.
//!
//! Construction is pure (no network I/O); failures surface only when an
//! operation is dispatched. Non-2xx responses are normal results, never
//! errors, so tests can assert on exact status codes.

pub mod health;
mod response;
pub mod token;
pub mod users;

pub use health::HealthApi;
pub use response::ApiResponse;
pub use token::TokenApi;
pub use users::UsersApi;

use reqwest::Method;
use reqwest::header;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Default authorization scheme prefix.
pub const DEFAULT_AUTH_PREFIX: &str = "Bearer";

/// Errors raised on the API channel.
///
/// Everything the service itself answers - including 4xx/5xx - is an
/// [`ApiResponse`], not an error. Only client-side rejections and transport
/// failures land here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was rejected client-side before dispatch (id-consistency
    /// rules for update operations). No network call was made.
    #[error("request violates API contract: {0}")]
    Contract(String),

    /// The base URL or a derived request URL could not be parsed.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request body could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request never produced an HTTP response (connection refused,
    /// timeout, DNS failure). Not retried.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client bound to a base URL and an optional bearer credential.
///
/// Cheap to clone; all wrappers share the same underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    authorization: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client for `base_url`.
    ///
    /// With a `token`, every request carries a fixed
    /// `Authorization: <prefix> <token>` header; without one the client is
    /// anonymous. No connection is opened here.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if `base_url` does not parse.
    pub fn build(base_url: &str, token: Option<&str>, prefix: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            authorization: token.map(|t| format!("{prefix} {t}")),
        })
    }

    /// The normalized base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether requests carry an `Authorization` header.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.base_url.join(path)?;
        let mut request = self.http.request(method, url);
        if let Some(authorization) = &self.authorization {
            request = request.header(header::AUTHORIZATION, authorization);
        }
        Ok(request)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.request(Method::GET, path)?.send().await?;
        ApiResponse::read(response).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.request(method, path)?.json(body).send().await?;
        ApiResponse::read(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<ApiResponse<()>, ApiError> {
        let response = self.request(Method::DELETE, path)?.send().await?;
        ApiResponse::read(response).await
    }
}
