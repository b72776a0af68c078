//! Health check payload.

use serde::{Deserialize, Serialize};

/// Response body of `GET /api/health/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Service status string (e.g., "ok").
    pub status: String,
}

impl HealthStatus {
    /// Whether the service reported itself healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_ok() {
        let status: HealthStatus = serde_json::from_str(r#"{"status":"ok"}"#).expect("valid");
        assert!(status.is_ok());
    }

    #[test]
    fn test_health_status_degraded() {
        let status: HealthStatus =
            serde_json::from_str(r#"{"status":"degraded"}"#).expect("valid");
        assert!(!status.is_ok());
    }
}
