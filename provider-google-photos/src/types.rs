//! Google Photos Library API request and response types
//!
//! Data structures for the JSON bodies of the Photos Library API v1.

use bridge_traits::{Album, MediaItem, MediaItemResult, MediaItemStatus, MediaUpload};
use serde::{Deserialize, Serialize};

/// Album resource
///
/// See: https://developers.google.com/photos/library/reference/rest/v1/albums#Album
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResource {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub product_url: Option<String>,

    /// Present only when the album is writeable by this application
    #[serde(default)]
    pub is_writeable: Option<bool>,

    /// int64 encoded as a JSON string
    #[serde(default)]
    pub media_items_count: Option<String>,

    #[serde(default)]
    pub cover_photo_base_url: Option<String>,

    #[serde(default)]
    pub cover_photo_media_item_id: Option<String>,
}

impl From<AlbumResource> for Album {
    fn from(resource: AlbumResource) -> Self {
        Album {
            id: resource.id,
            title: resource.title,
            product_url: resource.product_url,
            cover_photo_base_url: resource.cover_photo_base_url,
            cover_photo_media_item_id: resource.cover_photo_media_item_id,
            media_items_count: resource
                .media_items_count
                .and_then(|count| count.parse().ok()),
            is_writeable: resource.is_writeable,
        }
    }
}

/// albums.list response
///
/// An empty library omits `albums` entirely.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlbumsResponse {
    #[serde(default)]
    pub albums: Vec<AlbumResource>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// albums.create request body
#[derive(Debug, Serialize)]
pub struct CreateAlbumRequest<'a> {
    pub album: NewAlbum<'a>,
}

#[derive(Debug, Serialize)]
pub struct NewAlbum<'a> {
    pub title: &'a str,
}

/// mediaItems.batchCreate request body
///
/// See: https://developers.google.com/photos/library/reference/rest/v1/mediaItems/batchCreate
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateMediaItemsRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<&'a str>,

    pub new_media_items: Vec<NewMediaItem<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItem<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,

    pub simple_media_item: SimpleMediaItem<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMediaItem<'a> {
    pub upload_token: &'a str,
    pub file_name: &'a str,
}

impl<'a> From<&'a MediaUpload> for NewMediaItem<'a> {
    fn from(upload: &'a MediaUpload) -> Self {
        NewMediaItem {
            description: upload.description.as_deref(),
            simple_media_item: SimpleMediaItem {
                upload_token: &upload.upload_token,
                file_name: &upload.file_name,
            },
        }
    }
}

/// mediaItems.batchCreate response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateMediaItemsResponse {
    #[serde(default)]
    pub new_media_item_results: Vec<NewMediaItemResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItemResult {
    #[serde(default)]
    pub upload_token: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub media_item: Option<MediaItemResource>,
}

impl From<NewMediaItemResult> for MediaItemResult {
    fn from(result: NewMediaItemResult) -> Self {
        MediaItemResult {
            upload_token: result.upload_token,
            status: MediaItemStatus {
                code: result.status.code,
                message: result.status.message,
            },
            media_item: result.media_item.map(Into::into),
        }
    }
}

/// google.rpc.Status; an omitted code means OK
#[derive(Debug, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: Option<String>,
}

/// MediaItem resource
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemResource {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub product_url: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,
}

impl From<MediaItemResource> for MediaItem {
    fn from(resource: MediaItemResource) -> Self {
        MediaItem {
            id: resource.id,
            description: resource.description,
            product_url: resource.product_url,
            base_url: resource.base_url,
            mime_type: resource.mime_type,
            filename: resource.filename,
        }
    }
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: u16,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub status: Option<String>,
}
