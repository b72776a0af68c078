//! Verification channel: direct reads of persisted state, outside the API.
//!
//! The capability surface is deliberately tiny - look up a record, check
//! existence, delete by ids - and framework-agnostic, so the channel can
//! follow the service to a different storage technology without touching
//! test code.

pub mod postgres;
pub mod resolver;

pub use postgres::PgStoreDriver;

use async_trait::async_trait;
use dualprobe_core::User;
use thiserror::Error;

/// Errors raised on the verification channel.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached, even after the optional loopback
    /// fallback. The façade maps this to an absent driver so store-dependent
    /// assertions skip instead of failing.
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),

    /// A query failed after a connection was established. This indicates a
    /// real defect (schema mismatch, bad credentials on the table) rather
    /// than environment unreachability, so it fails the test instead of
    /// skipping it.
    #[error("store query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Read/delete capabilities against persisted user records.
///
/// One implementation per backing store; the shipped variant targets
/// PostgreSQL. A single driver's connection is pooled internally, but the
/// driver itself should not be shared across concurrent test workers -
/// construct one façade per worker instead.
#[async_trait]
pub trait StoreDriver: Send + Sync + std::fmt::Debug {
    /// Fetch a persisted user by id, or `None` when absent.
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Whether every given id is present. An empty slice is vacuously true.
    async fn users_exist(&self, ids: &[String]) -> Result<bool, StoreError>;

    /// Best-effort cleanup of test fixtures. Deleting absent ids is not an
    /// error; returns the number of rows actually removed.
    async fn delete_users_by_ids(&self, ids: &[String]) -> Result<u64, StoreError>;
}
