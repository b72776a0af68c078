//! Token payloads for the service's JWT endpoints.
//!
//! The façade never inspects or validates tokens; these types only carry the
//! strings handed out by `POST /api/token/` and `POST /api/token/refresh/`.

use serde::{Deserialize, Serialize};

/// Response body of `POST /api/token/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token, sent as the bearer credential.
    pub access: String,
    /// Long-lived refresh token.
    pub refresh: String,
}

/// Response body of `POST /api/token/refresh/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Fresh access token.
    pub access: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_decodes() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access":"a.b.c","refresh":"d.e.f"}"#).expect("valid");
        assert_eq!(pair.access, "a.b.c");
        assert_eq!(pair.refresh, "d.e.f");
    }
}
