//! Google Photos API connector implementation
//!
//! Implements the `MediaLibrary` and `ByteSource` traits for the Google
//! Photos Library API v1.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;
use sync_traits::{
    ByteSource, ByteStream, Collection, MediaItem, MediaLibrary, TokenSource,
};
use tokio_util::io::StreamReader;
use tracing::{debug, info, instrument};

use crate::error::GooglePhotosError;
use crate::types::{
    Album, AlbumsResponse, ApiMediaItem, MediaItemsResponse, SearchMediaItemsRequest,
};

/// Google Photos Library API base URL
const PHOTOS_API_BASE: &str = "https://photoslibrary.googleapis.com/v1";

/// Maximum results per albums.list page (API limit)
const ALBUM_PAGE_SIZE: u32 = 50;

/// Maximum results per media item page (API limit)
const ITEM_PAGE_SIZE: u32 = 100;

/// Google Photos API connector
///
/// Implements `MediaLibrary` for enumeration and `ByteSource` for
/// streaming downloads. Bearer tokens come from the injected
/// `TokenSource` on every request, so refreshes made mid-pass are
/// picked up without restarting.
pub struct GooglePhotosConnector {
    /// HTTP client for API requests
    http: reqwest::Client,

    /// OAuth 2.0 token source
    tokens: Arc<dyn TokenSource>,
}

impl GooglePhotosConnector {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
        }
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> sync_traits::Result<T> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| GooglePhotosError::NetworkError(e.to_string()))?;
        Self::decode(response).await
    }

    /// Execute a POST request with a JSON body and decode the response.
    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> sync_traits::Result<T> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(|e| GooglePhotosError::NetworkError(e.to_string()))?;
        Self::decode(response).await
    }

    /// Classify the response status and parse the JSON body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> sync_traits::Result<T> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            let message = response.text().await.unwrap_or_default();
            return Err(GooglePhotosError::AuthenticationFailed(message).into());
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GooglePhotosError::ApiError {
                status_code: status.as_u16(),
                message,
            }
            .into());
        }

        response
            .json()
            .await
            .map_err(|e| GooglePhotosError::ParseError(e.to_string()).into())
    }

    fn convert_album(album: Album) -> Collection {
        Collection {
            id: album.id,
            title: album.title,
        }
    }

    /// Convert an API media item to the engine's model.
    ///
    /// The capture time doubles as the version token: Google Photos
    /// rewrites it when an item is edited, and the API reports no byte
    /// size for originals, so `expected_size` stays unset.
    fn convert_item(item: ApiMediaItem) -> MediaItem {
        let version = item
            .media_metadata
            .and_then(|m| m.creation_time)
            .unwrap_or_default();

        MediaItem {
            id: item.id,
            filename: item.filename,
            base_url: item.base_url,
            version,
            expected_size: None,
        }
    }
}

#[async_trait]
impl MediaLibrary for GooglePhotosConnector {
    #[instrument(skip(self))]
    async fn list_collections(
        &self,
        cursor: Option<String>,
    ) -> sync_traits::Result<(Vec<Collection>, Option<String>)> {
        let mut url = format!("{}/albums?pageSize={}", PHOTOS_API_BASE, ALBUM_PAGE_SIZE);
        if let Some(page_token) = cursor {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(&page_token)));
        }

        let response: AlbumsResponse = self.get_json(url).await?;
        debug!(count = response.albums.len(), "Listed albums page");

        let collections = response
            .albums
            .into_iter()
            .map(Self::convert_album)
            .collect();
        Ok((collections, response.next_page_token))
    }

    #[instrument(skip(self), fields(collection_id = %collection_id))]
    async fn list_collection_items(
        &self,
        collection_id: &str,
        cursor: Option<String>,
    ) -> sync_traits::Result<(Vec<MediaItem>, Option<String>)> {
        let request = SearchMediaItemsRequest {
            album_id: collection_id.to_string(),
            page_size: ITEM_PAGE_SIZE,
            page_token: cursor,
        };

        let response: MediaItemsResponse = self
            .post_json(format!("{}/mediaItems:search", PHOTOS_API_BASE), &request)
            .await?;
        debug!(count = response.media_items.len(), "Listed album items page");

        let items = response
            .media_items
            .into_iter()
            .map(Self::convert_item)
            .collect();
        Ok((items, response.next_page_token))
    }

    #[instrument(skip(self))]
    async fn list_library_items(
        &self,
        cursor: Option<String>,
    ) -> sync_traits::Result<(Vec<MediaItem>, Option<String>)> {
        let mut url = format!("{}/mediaItems?pageSize={}", PHOTOS_API_BASE, ITEM_PAGE_SIZE);
        if let Some(page_token) = cursor {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(&page_token)));
        }

        let response: MediaItemsResponse = self.get_json(url).await?;
        debug!(count = response.media_items.len(), "Listed library page");

        let items = response
            .media_items
            .into_iter()
            .map(Self::convert_item)
            .collect();
        Ok((items, response.next_page_token))
    }
}

#[async_trait]
impl ByteSource for GooglePhotosConnector {
    /// Open the original bytes behind a media item's base URL.
    ///
    /// The `=d` suffix asks for the unmodified original rather than a
    /// resized preview.
    #[instrument(skip(self, locator))]
    async fn open_stream(&self, locator: &str) -> sync_traits::Result<(ByteStream, Option<u64>)> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(format!("{locator}=d"))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| GooglePhotosError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            let message = response.text().await.unwrap_or_default();
            return Err(GooglePhotosError::AuthenticationFailed(message).into());
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GooglePhotosError::ApiError {
                status_code: status.as_u16(),
                message,
            }
            .into());
        }

        let advertised_len = response.content_length();
        info!(len = ?advertised_len, "Opened media stream");

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let reader: ByteStream = Box::new(StreamReader::new(stream));
        Ok((reader, advertised_len))
    }
}
