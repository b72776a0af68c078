//! User record as exposed by the metadata service.

use serde::{Deserialize, Serialize};

/// A user record.
///
/// The `id` is an opaque string validated by the service (a checksummed
/// national ID in the shipped deployment); the façade treats it as a plain
/// key. The same shape is returned by both verification channels, so API
/// responses and direct store reads compare with `==`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key. Immutable once created.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Phone number in E.164 format (e.g., +972...).
    pub phone: String,
    /// Street address.
    pub address: String,
}
