//! Fetch port: streamed byte retrieval by remote locator.

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::Result;

/// A readable byte stream for one media object.
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Opens byte streams for remote locators.
///
/// Fails with a transport error if the locator is invalid or expired. The
/// optional length comes from response metadata and is advisory only.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Open a stream for the object behind `locator`.
    ///
    /// Returns the stream and the advertised content length, when known.
    async fn open_stream(&self, locator: &str) -> Result<(ByteStream, Option<u64>)>;
}
