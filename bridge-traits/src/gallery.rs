//! Remote photo-library contract.
//!
//! [`AlbumService`] is the capability the album resolver talks to. It is
//! deliberately thin: one page of albums per call, unconditional album
//! creation, and media-item creation from upload tokens. Title uniqueness,
//! caching and pagination draining live above this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::CallContext;
use crate::error::Result;

/// Album as reported by the remote photo library.
///
/// `title` is the lookup key used by the client even though the remote
/// service allows several albums with the same title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Album {
    /// Remote identifier; `None` until the service has created the album
    pub id: Option<String>,
    pub title: String,
    /// Link to the album in the service's web UI
    pub product_url: Option<String>,
    pub cover_photo_base_url: Option<String>,
    pub cover_photo_media_item_id: Option<String>,
    pub media_items_count: Option<u64>,
    /// Whether the application may add media to the album
    pub is_writeable: Option<bool>,
}

impl Album {
    /// An album value that has not been created remotely yet.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One page of an album listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlbumPage {
    pub albums: Vec<Album>,
    /// Continuation cursor; `None` or empty means this was the last page
    pub next_page_token: Option<String>,
}

impl AlbumPage {
    pub fn new(albums: Vec<Album>, next_page_token: Option<String>) -> Self {
        Self {
            albums,
            next_page_token,
        }
    }

    /// The token to request the next page with, if there is one.
    ///
    /// Page length says nothing about whether more pages remain.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    pub fn is_last(&self) -> bool {
        self.continuation().is_none()
    }
}

/// Bytes already uploaded to the service, identified by their upload token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub upload_token: String,
    pub file_name: String,
    pub description: Option<String>,
}

impl MediaUpload {
    pub fn new(upload_token: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            upload_token: upload_token.into(),
            file_name: file_name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Library item created from an upload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub description: Option<String>,
    pub product_url: Option<String>,
    pub base_url: Option<String>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
}

/// Per-item outcome status. A `code` of 0 means success.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaItemStatus {
    pub code: i32,
    pub message: Option<String>,
}

impl MediaItemStatus {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Result of creating one media item from an upload token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItemResult {
    pub upload_token: String,
    pub status: MediaItemStatus,
    pub media_item: Option<MediaItem>,
}

/// Remote album service trait
///
/// Implemented by remote photo-library connectors. Every call takes the
/// caller's [`CallContext`] and must honor its cancellation and deadline.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::gallery::AlbumService;
///
/// let first = service.list_albums(&ctx, 50, None).await?;
/// if let Some(token) = first.continuation() {
///     let second = service.list_albums(&ctx, 50, Some(token)).await?;
/// }
/// ```
#[async_trait]
pub trait AlbumService: Send + Sync {
    /// Fetch one page of albums.
    ///
    /// `page_token` is `None` for the first page. A page may hold fewer than
    /// `page_size` albums while still carrying a continuation token.
    async fn list_albums(
        &self,
        ctx: &CallContext,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<AlbumPage>;

    /// Create an album with `title`. Never checks for an existing title.
    async fn create_album(&self, ctx: &CallContext, title: &str) -> Result<Album>;

    /// Turn uploaded bytes into library items, optionally adding them to `album_id`.
    ///
    /// Implementations may split large inputs into several requests. An error
    /// after the first request does not undo items already created.
    async fn batch_create_media_items(
        &self,
        ctx: &CallContext,
        album_id: Option<&str>,
        items: &[MediaUpload],
    ) -> Result<Vec<MediaItemResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_page_continuation() {
        let page = AlbumPage::new(vec![], Some("next".to_string()));
        assert_eq!(page.continuation(), Some("next"));
        assert!(!page.is_last());
    }

    #[test]
    fn test_empty_token_is_terminal() {
        assert!(AlbumPage::new(vec![Album::titled("a")], None).is_last());
        assert!(AlbumPage::new(vec![Album::titled("a")], Some(String::new())).is_last());
    }

    #[test]
    fn test_album_builders() {
        let album = Album::titled("Holidays").with_id("abc");
        assert_eq!(album.title, "Holidays");
        assert_eq!(album.id.as_deref(), Some("abc"));
        assert_eq!(album.media_items_count, None);
    }

    #[test]
    fn test_media_item_status() {
        assert!(MediaItemStatus::default().is_ok());
        let failed = MediaItemStatus {
            code: 3,
            message: Some("invalid upload token".to_string()),
        };
        assert!(!failed.is_ok());
    }
}
