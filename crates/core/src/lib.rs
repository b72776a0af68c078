//! Dualprobe Core - Shared types library.
//!
//! This crate provides the wire types shared by the Dualprobe components:
//! - `client` - Dual-channel verification façade (HTTP + direct store)
//! - `integration-tests` - Component tests against a live deployment
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Serde models mirroring the metadata service's API payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
