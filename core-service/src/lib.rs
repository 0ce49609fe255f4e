//! Gallery client façade and bootstrap helpers.
//!
//! This crate wires the album resolver, the album cache and the Google Photos
//! connector into a single [`GalleryClient`]. Desktop apps typically enable
//! the `desktop-shims` feature, which lets [`GalleryConfig`] fall back to the
//! reqwest-backed HTTP client from `bridge-desktop`.
//!
//! ```ignore
//! use core_service::{GalleryClient, GalleryConfig};
//! use bridge_traits::{CallContext, MediaUpload};
//!
//! let client = GalleryClient::bootstrap(GalleryConfig::builder().access_token(token))?;
//! let ctx = CallContext::new();
//!
//! let album = client.create_album(&ctx, "Holidays").await?;
//! let upload = MediaUpload::new(upload_token, "beach.jpg");
//! client.add_media_to_album(&ctx, &upload, album.id.as_deref().unwrap_or_default()).await?;
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use core_runtime::config::{GalleryConfig, GalleryConfigBuilder};

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};

use bridge_traits::error::BridgeError;
use bridge_traits::{Album, AlbumService, CallContext, MediaItem, MediaUpload};
use core_gallery::{AlbumCache, AlbumResolver, InMemoryAlbumCache, ResolverOptions};
use core_runtime::logging::strip_path;
use provider_google_photos::GooglePhotosConnector;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, instrument, warn};

/// Per-title async locks for serialized album creation.
#[derive(Default)]
struct CreationLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CreationLocks {
    fn lock_for(&self, title: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(title.to_string()).or_default())
    }

    /// Forget the lock for `title` once `held` is its last user outside the map.
    fn release(&self, title: &str, held: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks
            .get(title)
            .is_some_and(|lock| Arc::ptr_eq(lock, held) && Arc::strong_count(lock) == 2)
        {
            locks.remove(title);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

/// A title's creation lock, released from the map on drop.
///
/// Dropping also covers a caller abandoning `create_album` mid-await.
struct CreationLease<'a> {
    locks: &'a CreationLocks,
    title: &'a str,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> CreationLease<'a> {
    fn new(locks: &'a CreationLocks, title: &'a str) -> Self {
        Self {
            locks,
            title,
            lock: locks.lock_for(title),
        }
    }

    async fn acquire(&self, ctx: &CallContext) -> Result<OwnedMutexGuard<()>> {
        let lock = Arc::clone(&self.lock);
        Ok(ctx
            .run(async { Ok::<_, BridgeError>(lock.lock_owned().await) })
            .await?)
    }
}

impl Drop for CreationLease<'_> {
    fn drop(&mut self) {
        self.locks.release(self.title, &self.lock);
    }
}

struct ClientInner {
    resolver: AlbumResolver,
    service: Arc<dyn AlbumService>,
    creation_locks: Option<CreationLocks>,
}

/// Primary façade exposed to host applications.
///
/// Album operations delegate to the [`AlbumResolver`]; media operations go
/// straight to the remote service. Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct GalleryClient {
    inner: Arc<ClientInner>,
}

impl GalleryClient {
    /// Assemble a client from explicit parts.
    ///
    /// With `serialize_album_creation` set, concurrent `create_album` calls
    /// for the same title run one after another, so the later call finds the
    /// album the earlier one created.
    pub fn new(
        resolver: AlbumResolver,
        service: Arc<dyn AlbumService>,
        serialize_album_creation: bool,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                resolver,
                service,
                creation_locks: serialize_album_creation.then(CreationLocks::default),
            }),
        }
    }

    /// Build the configuration and the client in one step.
    pub fn bootstrap(builder: GalleryConfigBuilder) -> Result<Self> {
        let config = builder.build()?;
        Self::from_config(&config)
    }

    /// Google Photos client with an in-memory album cache.
    pub fn from_config(config: &GalleryConfig) -> Result<Self> {
        let cache: Arc<dyn AlbumCache> =
            Arc::new(InMemoryAlbumCache::new(config.album_cache_capacity));
        Self::from_config_with_cache(config, cache)
    }

    /// Google Photos client backed by the given album cache.
    pub fn from_config_with_cache(
        config: &GalleryConfig,
        cache: Arc<dyn AlbumCache>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;

        let connector = GooglePhotosConnector::new(
            Arc::clone(&config.http_client),
            config.access_token.clone(),
        )
        .with_base_url(config.api_base_url.as_str())
        .with_retry_policy(config.retry_policy.clone());
        let service: Arc<dyn AlbumService> = Arc::new(connector);

        let options = ResolverOptions::default()
            .with_page_size(config.page_size)
            .with_cache_ttl(config.album_cache_ttl);
        let resolver = AlbumResolver::new(Arc::clone(&service), cache, options);

        info!(
            page_size = config.page_size,
            cache_capacity = config.album_cache_capacity,
            serialize_album_creation = config.serialize_album_creation,
            "Gallery client initialized"
        );

        Ok(Self::new(
            resolver,
            service,
            config.serialize_album_creation,
        ))
    }

    pub fn resolver(&self) -> &AlbumResolver {
        &self.inner.resolver
    }

    /// Every album in the library, in remote order.
    pub async fn list_albums(&self, ctx: &CallContext) -> Result<Vec<Album>> {
        Ok(self.inner.resolver.list_all_albums(ctx).await?)
    }

    /// Hand each page of the listing to `callback` until it breaks or the
    /// listing ends.
    pub async fn list_albums_with_callback<F>(&self, ctx: &CallContext, callback: F) -> Result<()>
    where
        F: FnMut(&[Album]) -> ControlFlow<()> + Send,
    {
        Ok(self
            .inner
            .resolver
            .list_albums_with_callback(ctx, callback)
            .await?)
    }

    /// The first album titled `title`; see [`CoreError::is_album_not_found`].
    pub async fn find_album(&self, ctx: &CallContext, title: &str) -> Result<Album> {
        Ok(self.inner.resolver.find_album(ctx, title).await?)
    }

    /// The album titled `title`, created if there is none.
    #[instrument(skip(self, ctx))]
    pub async fn create_album(&self, ctx: &CallContext, title: &str) -> Result<Album> {
        let Some(locks) = self.inner.creation_locks.as_ref() else {
            return Ok(self.inner.resolver.create_album(ctx, title).await?);
        };

        let lease = CreationLease::new(locks, title);
        let _guard = lease.acquire(ctx).await?;
        debug!("Holding album creation lock");

        Ok(self.inner.resolver.create_album(ctx, title).await?)
    }

    /// Forget the cached album for `title`.
    pub async fn invalidate_album(&self, ctx: &CallContext, title: &str) -> Result<()> {
        Ok(self.inner.resolver.invalidate_album(ctx, title).await?)
    }

    /// Turn an upload into a library item outside any album.
    pub async fn add_media_to_library(
        &self,
        ctx: &CallContext,
        upload: &MediaUpload,
    ) -> Result<MediaItem> {
        self.create_media_item(ctx, None, upload).await
    }

    /// Turn an upload into a library item inside `album_id`.
    pub async fn add_media_to_album(
        &self,
        ctx: &CallContext,
        upload: &MediaUpload,
        album_id: &str,
    ) -> Result<MediaItem> {
        self.create_media_item(ctx, Some(album_id), upload).await
    }

    #[instrument(skip(self, ctx, upload), fields(file = %strip_path(&upload.file_name)))]
    async fn create_media_item(
        &self,
        ctx: &CallContext,
        album_id: Option<&str>,
        upload: &MediaUpload,
    ) -> Result<MediaItem> {
        let results = self
            .inner
            .service
            .batch_create_media_items(ctx, album_id, std::slice::from_ref(upload))
            .await?;

        let failed = |message: String| CoreError::MediaCreationFailed {
            file_name: strip_path(&upload.file_name).to_string(),
            message,
        };

        let Some(result) = results.into_iter().next() else {
            warn!("Service returned no media item result");
            return Err(failed("no result returned".to_string()));
        };

        if !result.status.is_ok() {
            warn!(code = result.status.code, "Media item rejected");
            return Err(failed(format!(
                "status {}: {}",
                result.status.code,
                result.status.message.unwrap_or_default()
            )));
        }

        let item = result
            .media_item
            .ok_or_else(|| failed("result carried no media item".to_string()))?;

        info!(media_item_id = %item.id, "Media item created");
        Ok(item)
    }
}
