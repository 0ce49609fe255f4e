//! Google Photos Library API connector implementation
//!
//! Implements the `AlbumService` trait for the Photos Library API v1.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::gallery::{Album, AlbumPage, AlbumService, MediaItemResult, MediaUpload};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::CallContext;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{GooglePhotosError, Result};
use crate::types::{
    AlbumResource, BatchCreateMediaItemsRequest, BatchCreateMediaItemsResponse,
    CreateAlbumRequest, ErrorResponse, ListAlbumsResponse, NewAlbum, NewMediaItem,
};

/// Photos Library API base URL
pub const PHOTOS_API_BASE: &str = "https://photoslibrary.googleapis.com/v1";

/// Maximum albums per page (Photos Library API limit)
pub const MAX_PAGE_SIZE: u32 = 50;

/// Maximum items per mediaItems.batchCreate call (Photos Library API limit)
pub const MAX_BATCH_SIZE: usize = 50;

/// Wait suggested to the caller when a 429 carries no usable Retry-After
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Photos Library API connector
///
/// Implements [`AlbumService`] over an injected [`HttpClient`].
///
/// # Features
///
/// - Paginated album listing, page size clamped to the API maximum of 50
/// - Album creation
/// - Media item creation from upload tokens, optionally into an album
/// - Transport retries for listing only; creation requests are never replayed
///
/// # Example
///
/// ```ignore
/// use provider_google_photos::GooglePhotosConnector;
/// use bridge_traits::{AlbumService, CallContext};
///
/// let connector = GooglePhotosConnector::new(http_client, access_token);
/// let page = connector.list_albums(&CallContext::new(), 50, None).await?;
/// ```
pub struct GooglePhotosConnector {
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token with a `photoslibrary` scope
    access_token: String,

    base_url: String,

    /// Retry policy for idempotent requests
    retry_policy: RetryPolicy,
}

impl GooglePhotosConnector {
    /// Create a new Google Photos connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `access_token` - OAuth 2.0 access token
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
            base_url: PHOTOS_API_BASE.to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Point the connector at another API root (test servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .bearer_token(self.access_token.as_str())
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
    }

    fn json_request<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpRequest> {
        self.request(HttpMethod::Post, path)
            .json(body)
            .map_err(|e| GooglePhotosError::ParseError(format!("Failed to encode request: {}", e)))
    }

    /// Send `request` under `ctx` and map non-2xx statuses to typed errors.
    async fn send(
        &self,
        ctx: &CallContext,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let response = ctx
            .run(self.http_client.execute_with_retry(request, policy))
            .await?;

        Self::check_status(response)
    }

    fn check_status(response: HttpResponse) -> Result<HttpResponse> {
        let status = response.status;
        if response.is_success() {
            debug!(status, "API request succeeded");
            return Ok(response);
        }

        warn!(status, "API request failed");

        Err(match status {
            401 | 403 => GooglePhotosError::AuthenticationFailed(Self::error_message(&response)),
            404 => GooglePhotosError::NotFound(Self::error_message(&response)),
            429 => GooglePhotosError::RateLimitExceeded {
                retry_after_seconds: response
                    .header("Retry-After")
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS),
            },
            status_code => GooglePhotosError::ApiError {
                status_code,
                message: Self::error_message(&response),
            },
        })
    }

    /// Message from the API's error envelope, or the raw body.
    fn error_message(response: &HttpResponse) -> String {
        match serde_json::from_slice::<ErrorResponse>(&response.body) {
            Ok(envelope) => match envelope.error.status {
                Some(status) => format!("{} ({})", envelope.error.message, status),
                None => envelope.error.message,
            },
            Err(_) => String::from_utf8_lossy(&response.body).to_string(),
        }
    }

    fn decode<T: DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<T> {
        serde_json::from_slice(&response.body).map_err(|e| {
            GooglePhotosError::ParseError(format!("Failed to parse {}: {}", what, e))
        })
    }

    #[instrument(skip(self, ctx))]
    async fn fetch_album_page(
        &self,
        ctx: &CallContext,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<AlbumPage> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let mut path = format!("/albums?pageSize={}", page_size);

        if let Some(token) = page_token.filter(|token| !token.is_empty()) {
            path.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        let request = self.request(HttpMethod::Get, &path);
        let response = self.send(ctx, request, self.retry_policy.clone()).await?;
        let list: ListAlbumsResponse = Self::decode(&response, "albums list response")?;

        let albums: Vec<Album> = list.albums.into_iter().map(Album::from).collect();
        let page = AlbumPage::new(albums, list.next_page_token);
        debug!(
            count = page.albums.len(),
            has_more = page.continuation().is_some(),
            "Fetched album page"
        );

        Ok(page)
    }

    #[instrument(skip(self, ctx))]
    async fn post_album(&self, ctx: &CallContext, title: &str) -> Result<Album> {
        let body = CreateAlbumRequest {
            album: NewAlbum { title },
        };
        let request = self.json_request("/albums", &body)?;

        // Not idempotent: a replayed request can create a second album.
        let response = self.send(ctx, request, RetryPolicy::single_attempt()).await?;
        let resource: AlbumResource = Self::decode(&response, "created album")?;

        info!(album_id = resource.id.as_deref().unwrap_or_default(), "Created album");
        Ok(resource.into())
    }

    /// Create media items in requests of at most [`MAX_BATCH_SIZE`].
    ///
    /// Requests are not atomic across chunks: when a later chunk fails, the
    /// items of earlier chunks already exist remotely and only the error is
    /// returned. Callers that need to know which uploads were consumed should
    /// pass at most [`MAX_BATCH_SIZE`] items per call.
    #[instrument(skip(self, ctx, items), fields(items = items.len()))]
    async fn post_media_items(
        &self,
        ctx: &CallContext,
        album_id: Option<&str>,
        items: &[MediaUpload],
    ) -> Result<Vec<MediaItemResult>> {
        let mut results = Vec::with_capacity(items.len());

        for chunk in items.chunks(MAX_BATCH_SIZE) {
            let body = BatchCreateMediaItemsRequest {
                album_id,
                new_media_items: chunk.iter().map(NewMediaItem::from).collect(),
            };
            let request = self.json_request("/mediaItems:batchCreate", &body)?;

            let batch: BatchCreateMediaItemsResponse = match self
                .send(ctx, request, RetryPolicy::single_attempt())
                .await
                .and_then(|response| Self::decode(&response, "batch create response"))
            {
                Ok(batch) => batch,
                Err(err) => {
                    if !results.is_empty() {
                        warn!(
                            created = results.len(),
                            remaining = items.len() - results.len(),
                            "Batch create failed after earlier chunks were created"
                        );
                    }
                    return Err(err);
                }
            };

            results.extend(batch.new_media_item_results.into_iter().map(MediaItemResult::from));
        }

        let failed = results.iter().filter(|result| !result.status.is_ok()).count();
        if failed > 0 {
            warn!(failed, "Some media items were not created");
        }
        info!(created = results.len() - failed, "Created media items");

        Ok(results)
    }
}

#[async_trait]
impl AlbumService for GooglePhotosConnector {
    async fn list_albums(
        &self,
        ctx: &CallContext,
        page_size: u32,
        page_token: Option<&str>,
    ) -> BridgeResult<AlbumPage> {
        Ok(self.fetch_album_page(ctx, page_size, page_token).await?)
    }

    async fn create_album(&self, ctx: &CallContext, title: &str) -> BridgeResult<Album> {
        Ok(self.post_album(ctx, title).await?)
    }

    async fn batch_create_media_items(
        &self,
        ctx: &CallContext,
        album_id: Option<&str>,
        items: &[MediaUpload],
    ) -> BridgeResult<Vec<MediaItemResult>> {
        Ok(self.post_media_items(ctx, album_id, items).await?)
    }
}
