//! Detailed operation result carrying status, typed payload, and raw body.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::ApiError;

/// Result of one API operation.
///
/// Both success and error outcomes are represented: callers assert on
/// `status` and inspect `parsed` or `raw` instead of catching exceptions.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// HTTP status code returned by the service.
    pub status: StatusCode,
    /// Typed payload, populated only when the status is 2xx and the body
    /// decodes as `T`.
    pub parsed: Option<T>,
    /// Verbatim response body, kept for error-payload assertions.
    pub raw: String,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Drain a `reqwest` response into a detailed result.
    ///
    /// Decoding failures are not errors: `parsed` stays `None` and the body
    /// remains available in `raw`.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, ApiError> {
        let status = response.status();
        let raw = response.text().await?;
        let parsed = if status.is_success() {
            serde_json::from_str(&raw).ok()
        } else {
            None
        };

        Ok(Self {
            status,
            parsed,
            raw,
        })
    }
}

impl<T> ApiResponse<T> {
    /// Whether the status code is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// View the raw body as untyped JSON, if it is JSON at all.
    ///
    /// Useful for asserting on service error payloads (field-level validation
    /// messages) that have no typed model.
    #[must_use]
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.raw).ok()
    }
}
