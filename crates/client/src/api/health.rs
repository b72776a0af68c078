//! Health endpoint wrapper.

use dualprobe_core::HealthStatus;
use tracing::{debug, instrument};

use super::{ApiClient, ApiError, ApiResponse};

/// Operations around the public health endpoint.
#[derive(Debug, Clone)]
pub struct HealthApi {
    client: ApiClient,
}

impl HealthApi {
    /// Wrap a built client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Call `GET /api/health/`.
    ///
    /// Unauthenticated by the service; works on anonymous clients. Never
    /// raises for non-2xx - callers assert on the returned status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self))]
    pub async fn check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
        let response = self.client.get("api/health/").await?;
        debug!(status = %response.status, "health check completed");
        Ok(response)
    }
}
