//! Top-level error type for façade construction.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Any error the façade can surface to its caller.
///
/// Operation results carry their channel-specific error (`ApiError` or
/// `StoreError`) directly; this enum only unifies them for construction paths
/// that touch both channels.
#[derive(Debug, Error)]
pub enum ClientError {
    /// API channel failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Verification channel failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration loading failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
