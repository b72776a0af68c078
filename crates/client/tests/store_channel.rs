//! Fail-soft behavior of the verification channel.
//!
//! The façade must stay usable for API-only tests when the store is
//! unreachable, and the loopback fallback must be a deliberate, flag-gated
//! substitution.

#![allow(clippy::unwrap_used)]

use dualprobe_client::{DpClient, PgStoreDriver, StoreConfig, StoreError};
use secrecy::SecretString;
use tokio::net::TcpListener;

// Reserved TLD, never resolves - stands in for a compose service name seen
// from outside its network.
const UNRESOLVABLE_HOST: &str = "db.invalid";

fn store_config(host: &str, port: u16, allow_local_fallback: bool) -> StoreConfig {
    StoreConfig {
        host: host.to_string(),
        port,
        database: "metadata".to_string(),
        user: "metadata".to_string(),
        password: SecretString::from("s3cr3t"),
        allow_local_fallback,
        table: "metadata_manager_user".to_string(),
    }
}

async fn unused_port() -> u16 {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_unreachable_store_yields_absent_driver_not_error() {
    let port = unused_port().await;
    let config = store_config(UNRESOLVABLE_HOST, port, false);

    let client = DpClient::connect("http://localhost:8000", Some("tok"), None, Some(config))
        .await
        .unwrap();

    assert!(!client.store_available());
    assert!(client.store().is_none());
}

#[tokio::test]
async fn test_driver_connect_reports_unavailable_when_fallback_disabled() {
    let port = unused_port().await;
    let config = store_config(UNRESOLVABLE_HOST, port, false);

    let err = PgStoreDriver::connect(&config).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_fallback_enabled_connects_via_loopback() {
    // A listener on loopback stands in for the store's accept loop; the pool
    // is lazy, so construction only needs reachability.
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = store_config(UNRESOLVABLE_HOST, port, true);

    let driver = PgStoreDriver::connect(&config).await.unwrap();
    driver.close().await;
}

#[tokio::test]
async fn test_facade_with_fallback_enabled_keeps_store_channel() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = store_config(UNRESOLVABLE_HOST, port, true);

    let client = DpClient::connect("http://localhost:8000", Some("tok"), None, Some(config))
        .await
        .unwrap();

    assert!(client.store_available());
}
