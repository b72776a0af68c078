//! Users endpoints wrapper.
//!
//! Bodies are forwarded as-is - the service owns validation - except for the
//! two id-consistency contracts on update operations, which fail fast before
//! any network call:
//!
//! - `PUT` bodies may omit `id` (the path id is injected) or repeat the path
//!   id verbatim; a mismatching `id` is rejected client-side.
//! - `PATCH` bodies must never contain `id`; the field is immutable and the
//!   service would reject the request anyway.

use dualprobe_core::User;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ApiClient, ApiError, ApiResponse};

/// Operations around the `/api/users/` resource.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    /// Wrap a built client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create a user via `POST /api/users/`. The body passes through
    /// unmodified, including invalid payloads tests send on purpose.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if the body is not serializable and
    /// `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &impl Serialize) -> Result<ApiResponse<User>, ApiError> {
        let body = serde_json::to_value(body)?;
        let response = self
            .client
            .send_json(Method::POST, "api/users/", &body)
            .await?;
        debug!(status = %response.status, "user create dispatched");
        Ok(response)
    }

    /// Retrieve a user by id via `GET /api/users/{id}/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ApiResponse<User>, ApiError> {
        self.client.get(&format!("api/users/{id}/")).await
    }

    /// List all users via `GET /api/users/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.client.get("api/users/").await
    }

    /// List all user ids via `GET /api/users/ids/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self))]
    pub async fn list_ids(&self) -> Result<ApiResponse<Vec<String>>, ApiError> {
        self.client.get("api/users/ids/").await
    }

    /// Fully update a user via `PUT /api/users/{id}/`.
    ///
    /// If the body lacks an `id` field, the path id is injected before
    /// dispatch. A body id that differs from the path id is a contract
    /// violation and nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Contract` for a non-object body or an id mismatch,
    /// `ApiError::Encode` if the body is not serializable, and
    /// `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self, body))]
    pub async fn update(
        &self,
        id: &str,
        body: &impl Serialize,
    ) -> Result<ApiResponse<User>, ApiError> {
        let mut body = serde_json::to_value(body)?;
        let Some(fields) = body.as_object_mut() else {
            return Err(ApiError::Contract(
                "update body must be a JSON object".to_string(),
            ));
        };

        match fields.get("id").cloned() {
            None => {
                fields.insert("id".to_string(), Value::String(id.to_string()));
            }
            Some(body_id) if id_matches(&body_id, id) => {}
            Some(body_id) => {
                return Err(ApiError::Contract(format!(
                    "update body id {body_id} does not match path id {id}"
                )));
            }
        }

        let response = self
            .client
            .send_json(Method::PUT, &format!("api/users/{id}/"), &body)
            .await?;
        debug!(status = %response.status, "user update dispatched");
        Ok(response)
    }

    /// Partially update a user via `PATCH /api/users/{id}/`.
    ///
    /// Bodies containing an `id` field are rejected client-side and never
    /// forwarded.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Contract` for a non-object body or a body carrying
    /// `id`, `ApiError::Encode` if the body is not serializable, and
    /// `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self, body))]
    pub async fn partial_update(
        &self,
        id: &str,
        body: &impl Serialize,
    ) -> Result<ApiResponse<User>, ApiError> {
        let body = serde_json::to_value(body)?;
        let Some(fields) = body.as_object() else {
            return Err(ApiError::Contract(
                "partial update body must be a JSON object".to_string(),
            ));
        };

        if fields.contains_key("id") {
            return Err(ApiError::Contract(
                "partial update body must not contain an id field".to_string(),
            ));
        }

        let response = self
            .client
            .send_json(Method::PATCH, &format!("api/users/{id}/"), &body)
            .await?;
        debug!(status = %response.status, "user partial update dispatched");
        Ok(response)
    }

    /// Delete a user via `DELETE /api/users/{id}/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no HTTP response was produced.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<ApiResponse<()>, ApiError> {
        let response = self.client.delete(&format!("api/users/{id}/")).await?;
        debug!(status = %response.status, "user delete dispatched");
        Ok(response)
    }
}

/// Compare a body-supplied id against the path id.
///
/// Some callers always echo the id back and a few send it as a number; both
/// are accepted as long as the rendered value matches.
fn id_matches(body_id: &Value, path_id: &str) -> bool {
    match body_id {
        Value::String(s) => s == path_id,
        other => other.to_string() == path_id,
    }
}
