//! Wire types for the metadata service API.
//!
//! These models mirror the service's JSON payloads verbatim. No client-side
//! business validation happens here; the service owns validation.

pub mod health;
pub mod token;
pub mod user;

pub use health::HealthStatus;
pub use token::{AccessToken, TokenPair};
pub use user::User;
