//! Authenticated-session capability.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies a valid access token, refreshing transparently when needed.
///
/// Failures here mean no usable session exists; callers treat them as
/// unrecoverable for the current pass and never retry internally.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}
