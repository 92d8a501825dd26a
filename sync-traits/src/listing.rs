//! Listing port: cursor-paginated enumeration of the remote library.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Collection, MediaItem};

/// Paginated enumeration of remote collections and items.
///
/// Every method follows the same pagination contract: pass `None` to start,
/// pass the returned cursor to continue, stop when the returned cursor is
/// absent. An empty page with a cursor is legal and does not mean the end
/// of the listing.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// List collections (albums), one page per call.
    async fn list_collections(
        &self,
        cursor: Option<String>,
    ) -> Result<(Vec<Collection>, Option<String>)>;

    /// List the items belonging to one collection, one page per call.
    async fn list_collection_items(
        &self,
        collection_id: &str,
        cursor: Option<String>,
    ) -> Result<(Vec<MediaItem>, Option<String>)>;

    /// List the full item pool regardless of grouping, one page per call.
    async fn list_library_items(
        &self,
        cursor: Option<String>,
    ) -> Result<(Vec<MediaItem>, Option<String>)>;
}
