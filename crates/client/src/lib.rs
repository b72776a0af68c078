//! Dualprobe - dual-channel verification client for the metadata service.
//!
//! Integration tests drive the service under test through its HTTP API and
//! independently verify persisted state through a direct PostgreSQL
//! connection. This crate composes both channels behind one façade:
//!
//! - [`api`] - API client factory plus Health/Users/Token operation wrappers,
//!   enforcing the update-body/id consistency contracts client-side.
//! - [`store`] - pluggable verification channel with host resolution and
//!   opt-in loopback fallback; unreachability is fail-soft.
//! - [`DpClient`] - the composition root, exposing both structured
//!   sub-objects (`client.users.create(...)`) and flat convenience methods
//!   (`client.create_user(...)`) that delegate 1:1.
//!
//! # Example
//!
//! ```rust,no_run
//! use dualprobe_client::{DpClient, StoreConfig};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DpClient::connect(
//!     "http://localhost:8000",
//!     Some("access-token"),
//!     None,
//!     Some(StoreConfig::from_env()?),
//! )
//! .await?;
//!
//! let created = client
//!     .create_user(&json!({
//!         "id": "123456782",
//!         "name": "Test User",
//!         "phone": "+97286123456",
//!         "address": "Test Street 1",
//!     }))
//!     .await?;
//! assert_eq!(created.status, 201);
//!
//! // Out-of-band persistence check, skipped when the store is unreachable.
//! if let Some(store) = client.store() {
//!     let record = store.get_user_by_id("123456782").await?;
//!     assert!(record.is_some());
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod store;

pub use api::{
    ApiClient, ApiError, ApiResponse, DEFAULT_AUTH_PREFIX, HealthApi, TokenApi, UsersApi,
};
pub use config::{ConfigError, StoreConfig};
pub use dualprobe_core::{AccessToken, HealthStatus, TokenPair, User};
pub use error::ClientError;
pub use store::{PgStoreDriver, StoreDriver, StoreError};

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

/// Dual-channel verification façade.
///
/// Constructed once per test (or shared per session); immutable after
/// construction. All API state lives in the sub-objects, which share one
/// underlying HTTP client. The verification channel is `None` when no store
/// configuration was supplied or when the store is unreachable - callers
/// check [`Self::store`] and skip store-dependent assertions in that case.
#[derive(Debug)]
pub struct DpClient {
    /// Underlying bound HTTP client.
    pub api: ApiClient,
    /// Health endpoint operations.
    pub health: HealthApi,
    /// Users resource operations.
    pub users: UsersApi,
    /// Token endpoint operations.
    pub tokens: TokenApi,
    store: Option<Arc<dyn StoreDriver>>,
}

impl DpClient {
    /// Build an API-only façade with the default `Bearer` prefix and no
    /// verification channel. Pure construction, no I/O.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if `base_url` does not parse.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ClientError> {
        let api = ApiClient::build(base_url, token, DEFAULT_AUTH_PREFIX)?;
        Ok(Self::assemble(api, None))
    }

    /// Build the full façade.
    ///
    /// `prefix` defaults to `Bearer`. When `store` is supplied, the
    /// PostgreSQL driver is connected through the resolver; an unreachable
    /// store (after the optional loopback fallback) leaves the verification
    /// channel absent instead of failing, so API-only tests keep working.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if `base_url` does not parse. Store
    /// unreachability is not an error; other store failures propagate.
    pub async fn connect(
        base_url: &str,
        token: Option<&str>,
        prefix: Option<&str>,
        store: Option<StoreConfig>,
    ) -> Result<Self, ClientError> {
        let api = ApiClient::build(base_url, token, prefix.unwrap_or(DEFAULT_AUTH_PREFIX))?;

        let store = match store {
            None => None,
            Some(config) => match PgStoreDriver::connect(&config).await {
                Ok(driver) => Some(Arc::new(driver) as Arc<dyn StoreDriver>),
                Err(StoreError::Unavailable(reason)) => {
                    warn!(%reason, "verification channel absent, store assertions will skip");
                    None
                }
                Err(other) => return Err(other.into()),
            },
        };

        Ok(Self::assemble(api, store))
    }

    /// Replace the verification channel with a caller-supplied driver.
    ///
    /// This is the seam for non-PostgreSQL backends and for test doubles.
    #[must_use]
    pub fn with_store_driver(mut self, driver: Arc<dyn StoreDriver>) -> Self {
        self.store = Some(driver);
        self
    }

    fn assemble(api: ApiClient, store: Option<Arc<dyn StoreDriver>>) -> Self {
        Self {
            health: HealthApi::new(api.clone()),
            users: UsersApi::new(api.clone()),
            tokens: TokenApi::new(api.clone()),
            api,
            store,
        }
    }

    /// The verification channel, or `None` when the store is unreachable or
    /// was never configured.
    #[must_use]
    pub fn store(&self) -> Option<&dyn StoreDriver> {
        self.store.as_deref()
    }

    /// Whether store-dependent assertions can run.
    #[must_use]
    pub fn store_available(&self) -> bool {
        self.store.is_some()
    }

    // ------------------------------------------------------------------
    // Flat convenience methods.
    //
    // Kept for call-site brevity only; each delegates 1:1 to the structured
    // path and carries no logic of its own.
    // ------------------------------------------------------------------

    /// Flat alias for [`HealthApi::check`].
    ///
    /// # Errors
    ///
    /// Same as [`HealthApi::check`].
    pub async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
        self.health.check().await
    }

    /// Flat alias for [`UsersApi::create`].
    ///
    /// # Errors
    ///
    /// Same as [`UsersApi::create`].
    pub async fn create_user(&self, body: &impl Serialize) -> Result<ApiResponse<User>, ApiError> {
        self.users.create(body).await
    }

    /// Flat alias for [`UsersApi::get`].
    ///
    /// # Errors
    ///
    /// Same as [`UsersApi::get`].
    pub async fn get_user(&self, id: &str) -> Result<ApiResponse<User>, ApiError> {
        self.users.get(id).await
    }

    /// Flat alias for [`UsersApi::list`].
    ///
    /// # Errors
    ///
    /// Same as [`UsersApi::list`].
    pub async fn list_users(&self) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.users.list().await
    }

    /// Flat alias for [`UsersApi::update`].
    ///
    /// # Errors
    ///
    /// Same as [`UsersApi::update`].
    pub async fn update_user(
        &self,
        id: &str,
        body: &impl Serialize,
    ) -> Result<ApiResponse<User>, ApiError> {
        self.users.update(id, body).await
    }

    /// Flat alias for [`UsersApi::partial_update`].
    ///
    /// # Errors
    ///
    /// Same as [`UsersApi::partial_update`].
    pub async fn partial_update_user(
        &self,
        id: &str,
        body: &impl Serialize,
    ) -> Result<ApiResponse<User>, ApiError> {
        self.users.partial_update(id, body).await
    }

    /// Flat alias for [`UsersApi::delete`].
    ///
    /// # Errors
    ///
    /// Same as [`UsersApi::delete`].
    pub async fn delete_user(&self, id: &str) -> Result<ApiResponse<()>, ApiError> {
        self.users.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    #[derive(Debug)]
    struct CannedStore {
        user: User,
    }

    #[async_trait]
    impl StoreDriver for CannedStore {
        async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
            Ok((id == self.user.id).then(|| self.user.clone()))
        }

        async fn users_exist(&self, ids: &[String]) -> Result<bool, StoreError> {
            Ok(ids.iter().all(|id| *id == self.user.id))
        }

        async fn delete_users_by_ids(&self, ids: &[String]) -> Result<u64, StoreError> {
            Ok(u64::from(ids.contains(&self.user.id)))
        }
    }

    fn canned_user() -> User {
        User {
            id: "123456782".to_string(),
            name: "Test User".to_string(),
            phone: "+97286123456".to_string(),
            address: "Test Street 1".to_string(),
        }
    }

    #[test]
    fn test_new_has_no_verification_channel() {
        let client = DpClient::new("http://localhost:8000", None).unwrap();
        assert!(!client.store_available());
        assert!(client.store().is_none());
        assert!(!client.api.is_authenticated());
    }

    #[tokio::test]
    async fn test_connect_without_store_config() {
        let client = DpClient::connect("http://localhost:8000", Some("tok"), None, None)
            .await
            .unwrap();
        assert!(client.api.is_authenticated());
        assert!(!client.store_available());
    }

    #[tokio::test]
    async fn test_injected_store_driver_is_used() {
        let client = DpClient::new("http://localhost:8000", Some("tok"))
            .unwrap()
            .with_store_driver(Arc::new(CannedStore {
                user: canned_user(),
            }));

        let store = client.store().expect("driver injected");
        let record = store.get_user_by_id("123456782").await.unwrap();
        assert_eq!(record, Some(canned_user()));
        assert!(store.get_user_by_id("999999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_injected_store_delete_is_idempotent_shaped() {
        let client = DpClient::new("http://localhost:8000", None)
            .unwrap()
            .with_store_driver(Arc::new(CannedStore {
                user: canned_user(),
            }));

        let store = client.store().expect("driver injected");
        assert_eq!(
            store
                .delete_users_by_ids(&["999999999".to_string()])
                .await
                .unwrap(),
            0
        );
        assert_eq!(store.delete_users_by_ids(&[]).await.unwrap(), 0);
    }
}
