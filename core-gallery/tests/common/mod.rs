//! Test doubles for the album resolver.
//!
//! Every test builds its own [`FakeGallery`] and [`ScriptedCache`]; nothing
//! is shared between tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{
    Album, AlbumPage, AlbumService, CallContext, MediaItem, MediaItemResult, MediaItemStatus,
    MediaUpload,
};
use core_gallery::cache::{AlbumCache, CacheError, Result as CacheResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Title the fake service refuses to create.
pub const REJECTED_TITLE: &str = "should-fail";

/// In-memory album service paging through a fixed album list.
///
/// Page tokens are the decimal offset of the next album. Created albums are
/// appended to the list so later listings see them.
pub struct FakeGallery {
    albums: Mutex<Vec<Album>>,
    /// Serve at most this many albums per page, whatever was asked for
    short_page: Option<usize>,
    /// 1-based listing call that fails
    fail_on_list_call: Option<usize>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    page_sizes: Mutex<Vec<u32>>,
    tokens: Mutex<Vec<Option<String>>>,
}

impl FakeGallery {
    pub fn empty() -> Self {
        Self::with_albums(Vec::new())
    }

    /// Gallery holding `album-1` through `album-<n>`.
    pub fn numbered(n: usize) -> Self {
        Self::with_albums(
            (1..=n)
                .map(|i| Album::titled(format!("album-{}", i)).with_id(format!("id-{}", i)))
                .collect(),
        )
    }

    pub fn with_albums(albums: Vec<Album>) -> Self {
        Self {
            albums: Mutex::new(albums),
            short_page: None,
            fail_on_list_call: None,
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            page_sizes: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn short_pages(mut self, per_page: usize) -> Self {
        self.short_page = Some(per_page);
        self
    }

    pub fn fail_on_list_call(mut self, call: usize) -> Self {
        self.fail_on_list_call = Some(call);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn page_sizes(&self) -> Vec<u32> {
        self.page_sizes.lock().unwrap().clone()
    }

    /// Page tokens received, in call order.
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn album_count(&self) -> usize {
        self.albums.lock().unwrap().len()
    }
}

#[async_trait]
impl AlbumService for FakeGallery {
    async fn list_albums(
        &self,
        ctx: &CallContext,
        page_size: u32,
        page_token: Option<&str>,
    ) -> BridgeResult<AlbumPage> {
        ctx.check()?;

        let call = self.list_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.page_sizes.lock().unwrap().push(page_size);
        self.tokens
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));

        if self.fail_on_list_call == Some(call) {
            return Err(BridgeError::OperationFailed(format!(
                "listing failed on call {}",
                call
            )));
        }

        let offset = match page_token {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| {
                BridgeError::OperationFailed(format!("invalid page token '{}'", token))
            })?,
        };

        let albums = self.albums.lock().unwrap();
        let per_page = match self.short_page {
            Some(short) => short.min(page_size as usize),
            None => page_size as usize,
        };
        let end = (offset + per_page).min(albums.len());
        let page = albums[offset.min(end)..end].to_vec();
        let next = (end < albums.len()).then(|| end.to_string());

        Ok(AlbumPage::new(page, next))
    }

    async fn create_album(&self, ctx: &CallContext, title: &str) -> BridgeResult<Album> {
        ctx.check()?;
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if title == REJECTED_TITLE {
            return Err(BridgeError::OperationFailed(
                "album creation failure".to_string(),
            ));
        }

        let album = Album::titled(title).with_id(format!("created-{}", n));
        self.albums.lock().unwrap().push(album.clone());
        Ok(album)
    }

    async fn batch_create_media_items(
        &self,
        ctx: &CallContext,
        _album_id: Option<&str>,
        items: &[MediaUpload],
    ) -> BridgeResult<Vec<MediaItemResult>> {
        ctx.check()?;

        Ok(items
            .iter()
            .map(|item| MediaItemResult {
                upload_token: item.upload_token.clone(),
                status: MediaItemStatus::default(),
                media_item: Some(MediaItem {
                    id: format!("media-{}", item.upload_token),
                    filename: Some(item.file_name.clone()),
                    ..MediaItem::default()
                }),
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheFailure {
    None,
    OnGet,
    OnPut,
}

/// Cache with preset contents that records every write.
pub struct ScriptedCache {
    entries: Mutex<HashMap<String, Album>>,
    failure: CacheFailure,
    gets: AtomicUsize,
    puts: Mutex<Vec<(String, Album, Duration)>>,
    invalidations: Mutex<Vec<String>>,
}

impl ScriptedCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            failure: CacheFailure::None,
            gets: AtomicUsize::new(0),
            puts: Mutex::new(Vec::new()),
            invalidations: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: CacheFailure) -> Self {
        Self {
            failure,
            ..Self::new()
        }
    }

    pub fn holding(self, key: &str, album: Album) -> Self {
        self.entries.lock().unwrap().insert(key.to_string(), album);
        self
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> Vec<(String, Album, Duration)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn invalidations(&self) -> Vec<String> {
        self.invalidations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlbumCache for ScriptedCache {
    async fn get_album(&self, ctx: &CallContext, key: &str) -> CacheResult<Album> {
        ctx.check()?;
        self.gets.fetch_add(1, Ordering::SeqCst);

        if self.failure == CacheFailure::OnGet {
            return Err(CacheError::Backend("connection refused".to_string()));
        }

        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::miss(key))
    }

    async fn put_album(
        &self,
        ctx: &CallContext,
        key: &str,
        album: &Album,
        ttl: Duration,
    ) -> CacheResult<()> {
        ctx.check()?;

        if self.failure == CacheFailure::OnPut {
            return Err(CacheError::Backend("disk full".to_string()));
        }

        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), album.clone(), ttl));
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), album.clone());
        Ok(())
    }

    async fn invalidate_album(&self, ctx: &CallContext, key: &str) -> CacheResult<()> {
        ctx.check()?;

        self.invalidations.lock().unwrap().push(key.to_string());
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
