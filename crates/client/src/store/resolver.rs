//! Store endpoint resolution with opt-in loopback fallback.
//!
//! The store answers under one hostname inside an orchestrated network (the
//! compose service name) and under loopback when tests run on the host. The
//! resolver makes that difference transparent: two explicit attempts, gated
//! by a flag, never an implicit retry.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, warn};

use super::StoreError;

/// Address substituted when the configured host is unreachable and fallback
/// is enabled.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// How long one reachability probe may take.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Resolve a usable store host.
///
/// Probes `host:port` as given (covering both DNS and connect failures). On
/// failure with `allow_fallback` set, probes `127.0.0.1:port` instead.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` when no probe succeeds, carrying a hint
/// about how to make the store reachable.
pub async fn resolve(host: &str, port: u16, allow_fallback: bool) -> Result<String, StoreError> {
    if probe(host, port).await {
        return Ok(host.to_string());
    }

    if allow_fallback {
        warn!(host, port, "store host unreachable, probing loopback fallback");
        if probe(LOOPBACK_HOST, port).await {
            debug!(port, "store reachable via loopback fallback");
            return Ok(LOOPBACK_HOST.to_string());
        }
        return Err(StoreError::Unavailable(format!(
            "neither {host}:{port} nor {LOOPBACK_HOST}:{port} is reachable. \
             Hints: set POSTGRES_HOST to a reachable host, or start the \
             compose stack so the service name resolves."
        )));
    }

    Err(StoreError::Unavailable(format!(
        "{host}:{port} is not reachable and fallback is disabled. \
         Hints: set POSTGRES_HOST to a reachable host (e.g., localhost), or \
         export POSTGRES_ALLOW_LOCAL_FALLBACK=true to fall back to loopback \
         when the configured host is not resolvable."
    )))
}

/// One bounded TCP reachability probe.
async fn probe(host: &str, port: u16) -> bool {
    match tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(error)) => {
            debug!(host, port, %error, "store probe failed");
            false
        }
        Err(_) => {
            debug!(host, port, "store probe timed out");
            false
        }
    }
}
