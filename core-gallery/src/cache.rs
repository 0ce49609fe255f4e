//! Album cache contract and in-memory backend.
//!
//! The resolver stores every album it resolves from the remote listing under
//! [`album_cache_key`] so later lookups for the same title skip the network.
//! Entries carry a TTL; an expired entry reads as a miss.

use async_trait::async_trait;
use bridge_traits::error::BridgeError;
use bridge_traits::time::{Clock, SystemClock};
use bridge_traits::{Album, CallContext};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// Default number of albums kept by [`InMemoryAlbumCache`].
pub const DEFAULT_CAPACITY: usize = 256;

const ALBUM_KEY_PREFIX: &str = "album:";

/// Cache key for the album titled `title`.
///
/// Titles are the only identity the cache knows about; two remote albums
/// with the same title share one entry.
pub fn album_cache_key(title: &str) -> String {
    format!("{}{}", ALBUM_KEY_PREFIX, title)
}

#[derive(Error, Debug)]
pub enum CacheError {
    /// Nothing stored under `key`, or the entry expired
    #[error("Cache miss for key '{key}'")]
    Miss { key: String },

    /// The storage engine failed
    #[error("Cache backend failure: {0}")]
    Backend(String),

    /// The call context was cancelled or expired before the cache was touched
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl CacheError {
    pub fn miss(key: impl Into<String>) -> Self {
        CacheError::Miss { key: key.into() }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss { .. })
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Album cache trait
///
/// Any key/value store with per-entry expiry can back this. Implementations
/// must report an absent or expired key as [`CacheError::Miss`] and keep
/// every other failure distinguishable from it.
#[async_trait]
pub trait AlbumCache: Send + Sync {
    /// Fetch the album stored under `key`.
    async fn get_album(&self, ctx: &CallContext, key: &str) -> Result<Album>;

    /// Store `album` under `key`, replacing any previous entry.
    async fn put_album(
        &self,
        ctx: &CallContext,
        key: &str,
        album: &Album,
        ttl: Duration,
    ) -> Result<()>;

    /// Drop the entry under `key`. Succeeds when there is none.
    async fn invalidate_album(&self, ctx: &CallContext, key: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct CachedAlbum {
    album: Album,
    /// `None` never expires
    expires_at: Option<DateTime<Utc>>,
}

impl CachedAlbum {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// LRU album cache held in process memory.
///
/// Expired entries are dropped lazily when read. A `ttl` of
/// [`Duration::ZERO`] stores an entry that never expires; it still competes
/// for capacity with every other entry.
pub struct InMemoryAlbumCache {
    entries: RwLock<LruCache<String, CachedAlbum>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryAlbumCache {
    /// Create a cache holding at most `capacity` albums (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Create a cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            clock,
        }
    }

    /// Number of stored entries, expired ones included until they are read.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    fn expiry_for(&self, ttl: Duration) -> Option<DateTime<Utc>> {
        if ttl.is_zero() {
            return None;
        }
        // A TTL too large to represent is treated as no expiry.
        ChronoDuration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl))
    }
}

impl Default for InMemoryAlbumCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl AlbumCache for InMemoryAlbumCache {
    async fn get_album(&self, ctx: &CallContext, key: &str) -> Result<Album> {
        ctx.check()?;

        // LRU reads update recency, so even lookups take the write lock.
        let mut entries = self.entries.write().await;
        let now = self.clock.now();

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                trace!(key, "Album cache hit");
                return Ok(entry.album.clone());
            }
            Some(_) => {
                debug!(key, "Album cache entry expired");
            }
            None => {
                trace!(key, "Album cache miss");
                return Err(CacheError::miss(key));
            }
        }

        entries.pop(key);
        Err(CacheError::miss(key))
    }

    async fn put_album(
        &self,
        ctx: &CallContext,
        key: &str,
        album: &Album,
        ttl: Duration,
    ) -> Result<()> {
        ctx.check()?;

        let entry = CachedAlbum {
            album: album.clone(),
            expires_at: self.expiry_for(ttl),
        };

        let mut entries = self.entries.write().await;
        if let Some((evicted, _)) = entries.push(key.to_string(), entry) {
            if evicted != key {
                debug!(evicted = %evicted, "Album cache at capacity, evicted entry");
            }
        }
        Ok(())
    }

    async fn invalidate_album(&self, ctx: &CallContext, key: &str) -> Result<()> {
        ctx.check()?;

        self.entries.write().await.pop(key);
        Ok(())
    }
}
