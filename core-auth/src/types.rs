//! Stored token layout and token endpoint payloads.

use serde::{Deserialize, Serialize};

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Google authorized-user token file (`token.json`).
///
/// Matches the layout written by Google's client libraries, so an existing
/// consent flow's output can be used directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTokens {
    /// Current access token
    pub token: String,

    /// Long-lived refresh token, absent for some consent configurations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token endpoint URL
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Granted scopes
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Access token expiry (RFC 3339); absent means unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

/// Token endpoint response for the refresh grant.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,

    /// Lifetime of the new access token in seconds
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_token_file() {
        let json = r#"{
            "token": "ya29.abc",
            "refresh_token": "1//refresh",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "client.apps.googleusercontent.com",
            "client_secret": "secret",
            "scopes": ["https://www.googleapis.com/auth/photoslibrary.readonly"],
            "expiry": "2024-05-01T12:00:00.000000Z"
        }"#;

        let tokens: StoredTokens = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.token, "ya29.abc");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(tokens.scopes.len(), 1);
    }

    #[test]
    fn test_token_uri_defaults_when_absent() {
        let json = r#"{
            "token": "t",
            "client_id": "c",
            "client_secret": "s"
        }"#;

        let tokens: StoredTokens = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.token_uri, "https://oauth2.googleapis.com/token");
        assert!(tokens.refresh_token.is_none());
        assert!(tokens.expiry.is_none());
    }
}
