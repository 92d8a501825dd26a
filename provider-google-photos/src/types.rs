//! Google Photos API response types
//!
//! Data structures for (de)serializing Google Photos Library API v1
//! requests and responses.

use serde::{Deserialize, Serialize};

/// Google Photos API album resource
///
/// See: https://developers.google.com/photos/library/reference/rest/v1/albums
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Album ID
    pub id: String,

    /// Album title (may be absent for untitled albums)
    #[serde(default)]
    pub title: String,

    /// Number of media items in the album, as a string
    #[serde(default)]
    pub media_items_count: Option<String>,
}

/// Google Photos API albums.list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumsResponse {
    /// List of albums (absent when the library has none)
    #[serde(default)]
    pub albums: Vec<Album>,

    /// Token for the next page
    pub next_page_token: Option<String>,
}

/// Media metadata attached to a media item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    /// Capture time (RFC 3339); changes when the item is edited
    pub creation_time: Option<String>,

    /// Pixel width, as a string
    #[serde(default)]
    pub width: Option<String>,

    /// Pixel height, as a string
    #[serde(default)]
    pub height: Option<String>,
}

/// Google Photos API media item resource
///
/// See: https://developers.google.com/photos/library/reference/rest/v1/mediaItems
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaItem {
    /// Media item ID
    pub id: String,

    /// Original filename
    #[serde(default)]
    pub filename: String,

    /// Short-lived download URL; bytes live at `{base_url}=d`
    #[serde(default)]
    pub base_url: String,

    /// MIME type
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Media metadata (carries the capture time used as a version token)
    pub media_metadata: Option<MediaMetadata>,
}

/// Google Photos API mediaItems.list / mediaItems.search response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsResponse {
    /// List of media items (absent on empty pages)
    #[serde(default)]
    pub media_items: Vec<ApiMediaItem>,

    /// Token for the next page
    pub next_page_token: Option<String>,
}

/// Google Photos API mediaItems.search request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsRequest {
    /// Album to search within
    pub album_id: String,

    /// Maximum results per page
    pub page_size: u32,

    /// Token for the requested page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_albums_response() {
        let json = r#"{
            "albums": [
                {
                    "id": "album1",
                    "title": "Summer 2023",
                    "mediaItemsCount": "42"
                },
                {
                    "id": "album2"
                }
            ],
            "nextPageToken": "token123"
        }"#;

        let response: AlbumsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.albums.len(), 2);
        assert_eq!(response.albums[0].title, "Summer 2023");
        assert_eq!(response.albums[1].title, "");
        assert_eq!(response.next_page_token, Some("token123".to_string()));
    }

    #[test]
    fn test_deserialize_albums_response_without_albums() {
        let response: AlbumsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.albums.is_empty());
        assert_eq!(response.next_page_token, None);
    }

    #[test]
    fn test_deserialize_media_item() {
        let json = r#"{
            "id": "item1",
            "filename": "IMG_0001.jpg",
            "baseUrl": "https://lh3.googleusercontent.com/abc",
            "mimeType": "image/jpeg",
            "mediaMetadata": {
                "creationTime": "2023-06-01T12:00:00Z",
                "width": "4032",
                "height": "3024"
            }
        }"#;

        let item: ApiMediaItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "item1");
        assert_eq!(item.filename, "IMG_0001.jpg");
        assert_eq!(
            item.media_metadata.unwrap().creation_time,
            Some("2023-06-01T12:00:00Z".to_string())
        );
    }

    #[test]
    fn test_deserialize_media_items_response_empty_page() {
        let json = r#"{"nextPageToken": "more"}"#;

        let response: MediaItemsResponse = serde_json::from_str(json).unwrap();
        assert!(response.media_items.is_empty());
        assert_eq!(response.next_page_token, Some("more".to_string()));
    }

    #[test]
    fn test_serialize_search_request_skips_absent_token() {
        let request = SearchMediaItemsRequest {
            album_id: "album1".to_string(),
            page_size: 100,
            page_token: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"albumId":"album1","pageSize":100}"#);
    }

    #[test]
    fn test_serialize_search_request_with_token() {
        let request = SearchMediaItemsRequest {
            album_id: "album1".to_string(),
            page_size: 100,
            page_token: Some("token".to_string()),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""pageToken":"token""#));
    }
}
