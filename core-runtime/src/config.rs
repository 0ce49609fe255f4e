//! # Gallery Configuration Module
//!
//! Provides configuration management for the gallery client.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `GalleryConfig` instance that holds the credentials, tuning knobs and
//! bridge implementations the client is wired from. It enforces fail-fast
//! validation so a misconfigured client never reaches the network.
//!
//! ## Required Settings
//!
//! - `access_token` - OAuth bearer token for the Photos Library API
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//!
//! When the `desktop-shims` feature is enabled, a desktop-ready `HttpClient`
//! is injected automatically if none is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::GalleryConfig;
//! use std::time::Duration;
//!
//! let config = GalleryConfig::builder()
//!     .access_token(token)
//!     .album_cache_ttl(Duration::from_secs(600))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! The builder returns actionable messages when something is missing:
//!
//! ```ignore
//! use core_runtime::config::GalleryConfig;
//!
//! // Fails: no access token
//! let err = GalleryConfig::builder().build().unwrap_err();
//! ```

use crate::error::{Error, Result};
use bridge_traits::{HttpClient, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

pub use core_gallery::cache::DEFAULT_CAPACITY as DEFAULT_ALBUM_CACHE_CAPACITY;
pub use core_gallery::resolver::{DEFAULT_CACHE_TTL as DEFAULT_ALBUM_CACHE_TTL, DEFAULT_PAGE_SIZE};
pub use provider_google_photos::connector::{MAX_PAGE_SIZE, PHOTOS_API_BASE as DEFAULT_API_BASE_URL};

/// Configuration for the gallery client.
///
/// Use [`GalleryConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct GalleryConfig {
    /// OAuth bearer token sent on every API request
    pub access_token: String,

    /// API root, overridable for test servers
    pub api_base_url: String,

    /// Albums requested per listing page (1..=50)
    pub page_size: u32,

    /// Lifetime of a resolved album in the cache; zero never expires
    pub album_cache_ttl: Duration,

    /// Maximum number of cached albums
    pub album_cache_capacity: usize,

    /// Serialize concurrent `create_album` calls for the same title
    pub serialize_album_creation: bool,

    /// HTTP transport
    pub http_client: Arc<dyn HttpClient>,

    /// Retry policy for idempotent listing requests
    pub retry_policy: RetryPolicy,
}

impl std::fmt::Debug for GalleryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryConfig")
            .field("access_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("page_size", &self.page_size)
            .field("album_cache_ttl", &self.album_cache_ttl)
            .field("album_cache_capacity", &self.album_cache_capacity)
            .field("serialize_album_creation", &self.serialize_album_creation)
            .field("http_client", &"HttpClient { ... }")
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

impl GalleryConfig {
    /// Creates a new builder for constructing a `GalleryConfig`.
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The access token is not blank
    /// - The API base URL is an http(s) URL
    /// - Page size is within the API's 1..=50 range
    /// - Cache capacity is non-zero
    /// - The retry policy makes at least one attempt
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::Config("Access token cannot be empty".to_string()));
        }

        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }

        if self.album_cache_capacity == 0 {
            return Err(Error::Config(
                "Album cache capacity must be greater than 0".to_string(),
            ));
        }

        if self.retry_policy.max_attempts == 0 {
            return Err(Error::Config(
                "Retry policy must allow at least one attempt".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::capability_missing(
        "HttpClient",
        "HttpClient implementation is required to reach the Photos Library API. \
         Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
         Other hosts: inject an implementation with .http_client().",
    )
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new().map_err(|e| {
        Error::Internal(format!("Failed to initialize default HttpClient: {}", e))
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`GalleryConfig`] instances.
#[derive(Default)]
pub struct GalleryConfigBuilder {
    access_token: Option<String>,
    api_base_url: Option<String>,
    page_size: Option<u32>,
    album_cache_ttl: Option<Duration>,
    album_cache_capacity: Option<usize>,
    serialize_album_creation: bool,
    http_client: Option<Arc<dyn HttpClient>>,
    retry_policy: Option<RetryPolicy>,
}

impl GalleryConfigBuilder {
    /// Sets the OAuth access token (required).
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Overrides the API root. Trailing slashes are ignored.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the listing page size.
    ///
    /// Defaults to 50, the largest page the API serves.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets how long a resolved album stays cached.
    ///
    /// `Duration::ZERO` keeps entries until they are evicted or invalidated.
    pub fn album_cache_ttl(mut self, ttl: Duration) -> Self {
        self.album_cache_ttl = Some(ttl);
        self
    }

    pub fn album_cache_capacity(mut self, capacity: usize) -> Self {
        self.album_cache_capacity = Some(capacity);
        self
    }

    /// Serialize `create_album` calls per title.
    ///
    /// Off by default, in which case two racing creates for a title that
    /// does not exist yet can both create a remote album.
    pub fn serialize_album_creation(mut self, enabled: bool) -> Self {
        self.serialize_album_creation = enabled;
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// Optional when the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the retry policy used for album listing requests.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Builds the final `GalleryConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(GalleryConfig)` on success, or an error if:
    /// - The access token is missing
    /// - No `HttpClient` was injected and no platform default exists
    /// - Configuration values are out of range
    pub fn build(self) -> Result<GalleryConfig> {
        let access_token = self.access_token.ok_or_else(|| {
            Error::Config("Access token is required. Use .access_token() to set it.".to_string())
        })?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let api_base_url = self
            .api_base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let config = GalleryConfig {
            access_token,
            api_base_url,
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            album_cache_ttl: self.album_cache_ttl.unwrap_or(DEFAULT_ALBUM_CACHE_TTL),
            album_cache_capacity: self
                .album_cache_capacity
                .unwrap_or(DEFAULT_ALBUM_CACHE_CAPACITY),
            serialize_album_creation: self.serialize_album_creation,
            http_client,
            retry_policy: self.retry_policy.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
