//! Verification store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `POSTGRES_HOST` - Store hostname (service name inside compose networks)
//! - `POSTGRES_PORT` - Store port
//! - `POSTGRES_DB` - Database name
//! - `POSTGRES_USER` - Database user
//! - `POSTGRES_PASSWORD` - Database password
//!
//! ## Optional
//! - `POSTGRES_ALLOW_LOCAL_FALLBACK` - When truthy (`1`/`true`/`yes`/`on`),
//!   substitute a loopback address if `POSTGRES_HOST` is unreachable. Off by
//!   default so nothing is ever silently redirected.
//!
//! There are no hardcoded connection defaults: tests either provide the full
//! configuration or run without the verification channel.

use secrecy::SecretString;
use thiserror::Error;

/// Table holding user records in the shipped deployment.
pub const DEFAULT_USER_TABLE: &str = "metadata_manager_user";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection parameters for the verification store.
///
/// Immutable once handed to the façade. Host resolution (and the optional
/// loopback fallback) happens when the driver connects, not here, so a
/// late-starting store does not fail configuration loading.
#[derive(Clone)]
pub struct StoreConfig {
    /// Store hostname as configured (may only resolve inside an orchestrated
    /// network).
    pub host: String,
    /// Store port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: SecretString,
    /// Whether to retry against a loopback address when `host` is
    /// unreachable.
    pub allow_local_fallback: bool,
    /// Table queried for user records.
    pub table: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("allow_local_fallback", &self.allow_local_fallback)
            .field("table", &self.table)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests inject maps instead of mutating the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let host = require(&lookup, "POSTGRES_HOST")?;
        let port = require(&lookup, "POSTGRES_PORT")?
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("POSTGRES_PORT".to_string(), e.to_string()))?;
        let database = require(&lookup, "POSTGRES_DB")?;
        let user = require(&lookup, "POSTGRES_USER")?;
        let password = SecretString::from(require(&lookup, "POSTGRES_PASSWORD")?);
        let allow_local_fallback = lookup("POSTGRES_ALLOW_LOCAL_FALLBACK")
            .as_deref()
            .is_some_and(is_truthy);

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
            allow_local_fallback,
            table: DEFAULT_USER_TABLE.to_string(),
        })
    }

    /// Override the table queried for user records.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

/// Get a required variable from the lookup.
fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse the opt-in fallback flag.
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
