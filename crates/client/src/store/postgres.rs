//! PostgreSQL implementation of the verification channel.

use std::time::Duration;

use async_trait::async_trait;
use dualprobe_core::User;
use secrecy::ExposeSecret;
use sqlx::Row;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, instrument};

use super::resolver;
use super::{StoreDriver, StoreError};
use crate::config::StoreConfig;

/// Store driver backed by a lazily-connecting PostgreSQL pool.
///
/// Reachability is decided once at construction (with the optional loopback
/// fallback); actual connections are opened on first query and reused by the
/// pool, so no connection leaks across tests.
pub struct PgStoreDriver {
    pool: PgPool,
    table: String,
}

impl std::fmt::Debug for PgStoreDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStoreDriver")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl PgStoreDriver {
    /// Resolve the store endpoint and build the pool.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the host is unreachable even
    /// after the optional fallback. Callers that can run without the
    /// verification channel treat that case as "driver absent" rather than
    /// a failure.
    #[instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let host =
            resolver::resolve(&config.host, config.port, config.allow_local_fallback).await?;

        let options = PgConnectOptions::new()
            .host(&host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(config.password.expose_secret());

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy_with(options);

        debug!(%host, table = %config.table, "store driver ready");

        Ok(Self {
            pool,
            table: config.table.clone(),
        })
    }

    /// Close the pool and all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StoreDriver for PgStoreDriver {
    #[instrument(skip(self))]
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let query = format!(
            "SELECT id, name, phone, address FROM {} WHERE id = $1",
            self.table
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(User {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                phone: row.try_get("phone")?,
                address: row.try_get("address")?,
            })),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn users_exist(&self, ids: &[String]) -> Result<bool, StoreError> {
        if ids.is_empty() {
            return Ok(true);
        }

        let query = format!("SELECT COUNT(*) FROM {} WHERE id = ANY($1)", self.table);
        let row = sqlx::query(&query).bind(ids).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get(0)?;

        Ok(usize::try_from(count).is_ok_and(|count| count == ids.len()))
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn delete_users_by_ids(&self, ids: &[String]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let query = format!("DELETE FROM {} WHERE id = ANY($1)", self.table);
        let result = sqlx::query(&query).bind(ids).execute(&self.pool).await?;
        let removed = result.rows_affected();
        debug!(removed, "test fixtures deleted");

        Ok(removed)
    }
}
