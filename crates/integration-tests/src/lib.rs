//! Test harness for component tests against a live deployment.
//!
//! # Running Tests
//!
//! ```bash
//! # Point the harness at a running stack
//! export API_BASE_URL=http://localhost:8000
//! export TEST_USERNAME=qa TEST_PASSWORD=...   # or API_TOKEN directly
//! export POSTGRES_HOST=db POSTGRES_PORT=5432 POSTGRES_DB=... \
//!        POSTGRES_USER=... POSTGRES_PASSWORD=... \
//!        POSTGRES_ALLOW_LOCAL_FALLBACK=true
//!
//! cargo test -p dualprobe-integration-tests
//! ```
//!
//! Every live test skips - with a printed reason - when the environment is
//! not configured, so the suite is safe to run anywhere. Store-dependent
//! assertions additionally skip when the verification channel is absent.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Skip diagnostics are part of the harness contract.
#![allow(clippy::print_stderr)]

use std::sync::Once;

use dualprobe_client::{DpClient, StoreConfig, StoreDriver};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Initialize `tracing` output for test runs, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Base URL of the deployment under test.
///
/// Prefers `API_BASE_URL`; otherwise builds from `METADATA_HOST` and
/// `METADATA_PORT`. Returns `None` (tests skip) when neither is set.
#[must_use]
pub fn live_base_url() -> Option<String> {
    let _ = dotenvy::dotenv();

    if let Ok(url) = std::env::var("API_BASE_URL") {
        return Some(url);
    }
    let host = std::env::var("METADATA_HOST").ok()?;
    let port = std::env::var("METADATA_PORT").unwrap_or_else(|_| "8000".to_string());
    Some(format!("http://{host}:{port}"))
}

/// Live deployment handles for one test.
pub struct TestContext {
    /// Authenticated façade with the verification channel attached when the
    /// store is reachable.
    pub client: DpClient,
    /// Anonymous façade for public endpoints and authorization-failure
    /// assertions.
    pub anonymous: DpClient,
}

impl TestContext {
    /// Build the context, or `None` with a printed skip reason when the live
    /// environment is not configured.
    pub async fn new() -> Option<Self> {
        init_tracing();

        let Some(base_url) = live_base_url() else {
            eprintln!("skipping: live service not configured (set API_BASE_URL)");
            return None;
        };

        let Some(token) = acquire_token(&base_url).await else {
            return None;
        };

        // The store is optional: unreachable (or unconfigured) means
        // store-dependent assertions skip, not fail.
        let store = StoreConfig::from_env().ok();

        let client = match DpClient::connect(&base_url, Some(&token), None, store).await {
            Ok(client) => client,
            Err(error) => {
                eprintln!("skipping: could not build façade: {error}");
                return None;
            }
        };
        let anonymous = match DpClient::new(&base_url, None) {
            Ok(client) => client,
            Err(error) => {
                eprintln!("skipping: could not build anonymous façade: {error}");
                return None;
            }
        };

        Some(Self { client, anonymous })
    }

    /// The verification channel, printing a skip hint when absent.
    #[must_use]
    pub fn store(&self) -> Option<&dyn StoreDriver> {
        let store = self.client.store();
        if store.is_none() {
            eprintln!(
                "store checks skipped: database not reachable. Hints: set \
                 POSTGRES_HOST to a reachable host (e.g., localhost), export \
                 POSTGRES_ALLOW_LOCAL_FALLBACK=true, or start the compose \
                 stack so the service name resolves."
            );
        }
        store
    }
}

/// Resolve a bearer token: `API_TOKEN` if set, otherwise a login against
/// `/api/token/` with `TEST_USERNAME`/`TEST_PASSWORD`.
async fn acquire_token(base_url: &str) -> Option<String> {
    if let Ok(token) = std::env::var("API_TOKEN") {
        return Some(token);
    }

    let (Ok(username), Ok(password)) = (
        std::env::var("TEST_USERNAME"),
        std::env::var("TEST_PASSWORD"),
    ) else {
        eprintln!("skipping: set API_TOKEN or TEST_USERNAME/TEST_PASSWORD for authenticated tests");
        return None;
    };

    let client = match DpClient::new(base_url, None) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("skipping: invalid API_BASE_URL: {error}");
            return None;
        }
    };
    match client.tokens.obtain(&username, &password).await {
        Ok(response) => match response.parsed {
            Some(pair) => Some(pair.access),
            None => {
                eprintln!(
                    "skipping: token endpoint answered {} without a token pair",
                    response.status
                );
                None
            }
        },
        Err(error) => {
            eprintln!("skipping: token endpoint unreachable: {error}");
            None
        }
    }
}

/// Tracks ids created during a test for best-effort cleanup through the
/// verification channel. Cleanup tolerates an absent store.
#[derive(Debug, Default)]
pub struct CreatedUsers {
    ids: Vec<String>,
}

impl CreatedUsers {
    /// Start an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id for cleanup.
    pub fn track(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    /// Delete all tracked ids. Absent store or failed deletes are reported,
    /// never fatal.
    pub async fn cleanup(&mut self, client: &DpClient) {
        if self.ids.is_empty() {
            return;
        }
        let Some(store) = client.store() else {
            eprintln!("cleanup skipped for {:?}: store not reachable", self.ids);
            return;
        };
        if let Err(error) = store.delete_users_by_ids(&self.ids).await {
            eprintln!("cleanup failed for {:?}: {error}", self.ids);
        }
        self.ids.clear();
    }
}

/// Generate a random valid Israeli phone number in E.164 format.
#[must_use]
pub fn generate_phone_number() -> String {
    let suffix = rand::random_range(100_000..=999_999);
    format!("+97286{suffix}")
}

/// Validate a 9-digit Israeli ID (Teudat Zehut) checksum.
#[must_use]
pub fn is_valid_israeli_id(id: &str) -> bool {
    if id.len() != 9 || !id.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let total: u32 = id
        .bytes()
        .enumerate()
        .map(|(idx, b)| {
            let digit = u32::from(b - b'0');
            let product = digit * if idx % 2 == 0 { 1 } else { 2 };
            if product > 9 { product - 9 } else { product }
        })
        .sum();

    total % 10 == 0
}

/// Generate a random 9-digit Israeli ID that passes the checksum.
#[must_use]
pub fn generate_israeli_id() -> String {
    let digits: Vec<u32> = (0..8).map(|_| rand::random_range(0..=9)).collect();

    let total: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, &digit)| {
            let product = digit * if idx % 2 == 0 { 1 } else { 2 };
            if product > 9 { product - 9 } else { product }
        })
        .sum();
    // Position 8 carries weight 1, so the check digit is the complement.
    let check = (10 - total % 10) % 10;

    digits
        .iter()
        .chain(std::iter::once(&check))
        .map(ToString::to_string)
        .collect()
}
