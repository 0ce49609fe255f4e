//! # Core Gallery Module
//!
//! Album resolution and caching for a remote photo library.
//!
//! ## Overview
//!
//! - [`AlbumCache`](cache::AlbumCache) - Key/value album cache with TTL,
//!   plus the [`InMemoryAlbumCache`](cache::InMemoryAlbumCache) LRU backend
//! - [`AlbumResolver`](resolver::AlbumResolver) - Cached find, full listing
//!   across pages, and find-or-create by title
//!
//! Albums are addressed by title. A cache hit is trusted without asking the
//! remote service; a miss drains the remote listing until the first album
//! with an exactly matching title turns up.
//!
//! ## Usage
//!
//! ```ignore
//! use core_gallery::{AlbumResolver, InMemoryAlbumCache, ResolverOptions};
//! use bridge_traits::CallContext;
//! use std::sync::Arc;
//!
//! let resolver = AlbumResolver::new(
//!     service,
//!     Arc::new(InMemoryAlbumCache::new(256)),
//!     ResolverOptions::default(),
//! );
//!
//! let album = resolver.create_album(&CallContext::new(), "Holidays").await?;
//! ```

pub mod cache;
pub mod error;
pub mod resolver;

pub use cache::{album_cache_key, AlbumCache, CacheError, InMemoryAlbumCache};
pub use error::{GalleryError, Result};
pub use resolver::{AlbumResolver, ResolverOptions};
