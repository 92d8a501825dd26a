//! Token manager: loads stored tokens, refreshes them when stale, and
//! persists rotations back to the token file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sync_traits::TokenSource;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{AuthError, Result};
use crate::types::{RefreshResponse, StoredTokens};

/// Clock skew subtracted from expiry so tokens are rotated before they
/// actually lapse mid-request.
const EXPIRY_SKEW_SECS: i64 = 60;

/// File-backed token manager implementing the `TokenSource` capability.
///
/// `access_token` returns the stored token while it is fresh; when expiry
/// is near it performs the refresh grant, rewrites the token file, and
/// returns the rotated token. Concurrent callers are serialized through an
/// internal lock so only one refresh runs at a time.
pub struct TokenManager {
    path: PathBuf,
    http: reqwest::Client,
    state: RwLock<StoredTokens>,
}

impl TokenManager {
    /// Load tokens from `path`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenFile` if the file is missing or malformed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| AuthError::TokenFile(format!("{}: {}", path.display(), e)))?;
        let tokens: StoredTokens = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::TokenFile(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Loaded stored credentials");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("photosync/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            path,
            http,
            state: RwLock::new(tokens),
        })
    }

    /// Whether the stored access token should be refreshed.
    ///
    /// Unknown or unparsable expiry is treated as expired; refreshing a
    /// still-valid token is harmless, using a lapsed one is not.
    fn is_expired(tokens: &StoredTokens) -> bool {
        match tokens.expiry.as_deref() {
            Some(expiry) => match DateTime::parse_from_rfc3339(expiry) {
                Ok(at) => {
                    let deadline = at.with_timezone(&Utc).timestamp() - EXPIRY_SKEW_SECS;
                    Utc::now().timestamp() >= deadline
                }
                Err(_) => true,
            },
            None => true,
        }
    }

    /// Exchange the refresh token for a new access token.
    #[instrument(skip(self, tokens))]
    async fn refresh(&self, tokens: &mut StoredTokens) -> Result<()> {
        let refresh_token = tokens
            .refresh_token
            .as_deref()
            .ok_or(AuthError::NotAuthenticated)?;

        debug!(token_uri = %tokens.token_uri, "Refreshing access token");

        let params = [
            ("client_id", tokens.client_id.as_str()),
            ("client_secret", tokens.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&tokens.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RefreshFailed(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        tokens.token = refreshed.access_token;
        tokens.expiry = Some(
            (Utc::now() + chrono::Duration::seconds(refreshed.expires_in))
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        );

        // Persist the rotation so the next run starts from a fresh token.
        let serialized = serde_json::to_vec_pretty(tokens)
            .map_err(|e| AuthError::TokenFile(e.to_string()))?;
        if let Err(e) = tokio::fs::write(&self.path, serialized).await {
            warn!(path = %self.path.display(), error = %e, "Failed to persist refreshed token");
        }

        info!("Access token refreshed");
        Ok(())
    }
}

#[async_trait]
impl TokenSource for TokenManager {
    async fn access_token(&self) -> sync_traits::Result<String> {
        {
            let tokens = self.state.read().await;
            if !Self::is_expired(&tokens) {
                return Ok(tokens.token.clone());
            }
        }

        let mut tokens = self.state.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if Self::is_expired(&tokens) {
            self.refresh(&mut tokens).await?;
        }
        Ok(tokens.token.clone())
    }
}
