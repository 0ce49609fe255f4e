//! Album resolution: cached find, full listing, and find-or-create.
//!
//! The resolver reconciles three sources of truth that never talk to each
//! other: the album cache, the paginated remote listing, and remote album
//! creation. Lookups go cache first, then walk the listing page by page in
//! remote order. Creation always looks up first so an existing album with the
//! same title is returned instead of duplicated.
//!
//! The resolver does not retry, does not add timeouts and does not
//! coordinate concurrent callers. Two racing `create_album` calls for a title
//! that does not exist yet can both create a remote album.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{Album, AlbumService, CallContext};
use tracing::{debug, info, instrument};

use crate::cache::{album_cache_key, AlbumCache};
use crate::error::{GalleryError, Result};

/// Largest page the Photos Library albums endpoint serves.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Tuning for [`AlbumResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Albums requested per listing call
    pub page_size: u32,
    /// Lifetime of albums cached after a remote lookup; zero never expires
    pub cache_ttl: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl ResolverOptions {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Resolves albums by title against a cache and a remote album service.
pub struct AlbumResolver {
    service: Arc<dyn AlbumService>,
    cache: Arc<dyn AlbumCache>,
    options: ResolverOptions,
}

impl AlbumResolver {
    /// A page size of zero is raised to one.
    pub fn new(
        service: Arc<dyn AlbumService>,
        cache: Arc<dyn AlbumCache>,
        options: ResolverOptions,
    ) -> Self {
        let options = ResolverOptions {
            page_size: options.page_size.max(1),
            ..options
        };

        Self {
            service,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Walk the remote listing, handing each page to `callback` in order.
    ///
    /// Pagination continues while the service returns a non-empty page
    /// token, regardless of how many albums a page holds. Returning
    /// [`ControlFlow::Break`] stops before the next page is requested.
    #[instrument(skip(self, ctx, callback), fields(page_size = self.options.page_size))]
    pub async fn list_albums_with_callback<F>(&self, ctx: &CallContext, mut callback: F) -> Result<()>
    where
        F: FnMut(&[Album]) -> ControlFlow<()> + Send,
    {
        let mut page_token: Option<String> = None;
        let mut pages: u32 = 0;

        loop {
            let page = self
                .service
                .list_albums(ctx, self.options.page_size, page_token.as_deref())
                .await?;
            pages += 1;

            debug!(page = pages, albums = page.albums.len(), "Fetched album page");

            if callback(&page.albums).is_break() {
                debug!(pages, "Album listing stopped early");
                return Ok(());
            }

            match page.continuation() {
                Some(token) => page_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(pages, "Album listing drained");
        Ok(())
    }

    /// Every album in the library, in remote order.
    ///
    /// The result is never cached. An empty library yields an empty list.
    #[instrument(skip(self, ctx))]
    pub async fn list_all_albums(&self, ctx: &CallContext) -> Result<Vec<Album>> {
        let mut albums = Vec::new();

        self.list_albums_with_callback(ctx, |page| {
            albums.extend_from_slice(page);
            ControlFlow::Continue(())
        })
        .await?;

        info!(count = albums.len(), "Listed albums");
        Ok(albums)
    }

    /// The first album titled exactly `title`.
    ///
    /// A cached entry is returned without asking the remote service. On a
    /// miss the listing is walked until the first match, which is cached
    /// for `cache_ttl` before it is returned.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::AlbumNotFound`] when no album has this title
    /// - [`GalleryError::Cache`] when the cache backend fails (a miss is not a failure)
    /// - [`GalleryError::Remote`] when a listing call fails, on any page
    #[instrument(skip(self, ctx))]
    pub async fn find_album(&self, ctx: &CallContext, title: &str) -> Result<Album> {
        let key = album_cache_key(title);

        match self.cache.get_album(ctx, &key).await {
            Ok(album) => {
                debug!("Album served from cache");
                return Ok(album);
            }
            Err(err) if err.is_miss() => {}
            Err(err) => return Err(err.into()),
        }

        let mut found = None;
        self.list_albums_with_callback(ctx, |page| {
            match page.iter().find(|album| album.title == title) {
                Some(album) => {
                    found = Some(album.clone());
                    ControlFlow::Break(())
                }
                None => ControlFlow::Continue(()),
            }
        })
        .await?;

        let Some(album) = found else {
            debug!("No album with this title");
            return Err(GalleryError::AlbumNotFound {
                title: title.to_string(),
            });
        };

        self.cache
            .put_album(ctx, &key, &album, self.options.cache_ttl)
            .await?;

        debug!(album_id = album.id.as_deref().unwrap_or_default(), "Album resolved remotely");
        Ok(album)
    }

    /// Find the album titled `title`, creating it when there is none.
    ///
    /// A newly created album is not written to the cache; the next
    /// `find_album` for it goes to the remote listing.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::InvalidInput`] when an empty title would have to be created
    /// - any lookup failure other than not-found, without creating anything
    /// - the remote creation failure, unchanged
    #[instrument(skip(self, ctx))]
    pub async fn create_album(&self, ctx: &CallContext, title: &str) -> Result<Album> {
        match self.find_album(ctx, title).await {
            Ok(album) => {
                debug!("Album already exists");
                Ok(album)
            }
            Err(GalleryError::AlbumNotFound { .. }) if title.is_empty() => {
                Err(GalleryError::InvalidInput {
                    field: "title".to_string(),
                    message: "album title cannot be empty".to_string(),
                })
            }
            Err(GalleryError::AlbumNotFound { .. }) => {
                let album = self.service.create_album(ctx, title).await?;
                info!(album_id = album.id.as_deref().unwrap_or_default(), "Created album");
                Ok(album)
            }
            Err(err) => Err(err),
        }
    }

    /// Drop the cached entry for `title`, if any.
    #[instrument(skip(self, ctx))]
    pub async fn invalidate_album(&self, ctx: &CallContext, title: &str) -> Result<()> {
        self.cache
            .invalidate_album(ctx, &album_cache_key(title))
            .await?;
        Ok(())
    }
}
