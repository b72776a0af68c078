//! Token endpoints wrapper.
//!
//! Token issuance and validation belong to the service; this wrapper only
//! exchanges credentials for the token strings the façade carries.

use dualprobe_core::{AccessToken, TokenPair};
use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, ApiError, ApiResponse};

/// Operations around the `/api/token/` endpoints.
#[derive(Debug, Clone)]
pub struct TokenApi {
    client: ApiClient,
}

impl TokenApi {
    /// Wrap a built client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token pair via `POST /api/token/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self, password))]
    pub async fn obtain(
        &self,
        username: &str,
        password: &str,
    ) -> Result<ApiResponse<TokenPair>, ApiError> {
        let body = json!({ "username": username, "password": password });
        self.client.send_json(Method::POST, "api/token/", &body).await
    }

    /// Trade a refresh token for a new access token via
    /// `POST /api/token/refresh/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self, refresh))]
    pub async fn refresh(&self, refresh: &str) -> Result<ApiResponse<AccessToken>, ApiError> {
        let body = json!({ "refresh": refresh });
        self.client
            .send_json(Method::POST, "api/token/refresh/", &body)
            .await
    }
}
