//! Façade behavior over an in-memory album service.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{
    Album, AlbumPage, AlbumService, CallContext, MediaItem, MediaItemResult, MediaItemStatus,
    MediaUpload,
};
use core_gallery::{AlbumResolver, InMemoryAlbumCache, ResolverOptions};
use core_service::{CoreError, GalleryClient};

/// Single-page album service that records what it was asked to do.
#[derive(Default)]
struct FakeService {
    albums: Mutex<Vec<Album>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    batches: Mutex<Vec<(Option<String>, Vec<String>)>>,
    media_results: Mutex<Option<BridgeResult<Vec<MediaItemResult>>>>,
}

impl FakeService {
    fn with_titles(titles: &[&str]) -> Self {
        let albums = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Album::titled(*title).with_id(format!("id-{}", i)))
            .collect();

        Self {
            albums: Mutex::new(albums),
            ..Self::default()
        }
    }

    fn respond_with(self, results: BridgeResult<Vec<MediaItemResult>>) -> Self {
        *self.media_results.lock().unwrap() = Some(results);
        self
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn batches(&self) -> Vec<(Option<String>, Vec<String>)> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlbumService for FakeService {
    async fn list_albums(
        &self,
        ctx: &CallContext,
        _page_size: u32,
        _page_token: Option<&str>,
    ) -> BridgeResult<AlbumPage> {
        ctx.check()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(AlbumPage::new(self.albums.lock().unwrap().clone(), None))
    }

    async fn create_album(&self, ctx: &CallContext, title: &str) -> BridgeResult<Album> {
        ctx.check()?;
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);

        // Let a concurrent caller run between the listing and the insert.
        tokio::task::yield_now().await;

        let album = Album::titled(title).with_id(format!("created-{}", n));
        self.albums.lock().unwrap().push(album.clone());
        Ok(album)
    }

    async fn batch_create_media_items(
        &self,
        ctx: &CallContext,
        album_id: Option<&str>,
        items: &[MediaUpload],
    ) -> BridgeResult<Vec<MediaItemResult>> {
        ctx.check()?;
        self.batches.lock().unwrap().push((
            album_id.map(str::to_string),
            items.iter().map(|item| item.upload_token.clone()).collect(),
        ));

        match self.media_results.lock().unwrap().take() {
            Some(results) => results,
            None => Ok(items
                .iter()
                .map(|item| ok_result(&item.upload_token, Some("media-1")))
                .collect()),
        }
    }
}

fn ok_result(upload_token: &str, media_id: Option<&str>) -> MediaItemResult {
    MediaItemResult {
        upload_token: upload_token.to_string(),
        status: MediaItemStatus::default(),
        media_item: media_id.map(|id| MediaItem {
            id: id.to_string(),
            ..MediaItem::default()
        }),
    }
}

fn client(service: Arc<FakeService>, serialize_album_creation: bool) -> GalleryClient {
    let resolver = AlbumResolver::new(
        service.clone(),
        Arc::new(InMemoryAlbumCache::new(16)),
        ResolverOptions::default(),
    );
    GalleryClient::new(resolver, service, serialize_album_creation)
}

#[tokio::test]
async fn test_list_albums_returns_remote_order() {
    let service = Arc::new(FakeService::with_titles(&["b", "a", "c"]));
    let client = client(service, false);

    let titles: Vec<String> = client
        .list_albums(&CallContext::new())
        .await
        .unwrap()
        .into_iter()
        .map(|album| album.title)
        .collect();

    assert_eq!(titles, vec!["b", "a", "c"]);
}

#[tokio::test]
async fn test_list_albums_with_callback_sees_page() {
    let service = Arc::new(FakeService::with_titles(&["a", "b"]));
    let client = client(service, false);

    let mut seen = 0;
    client
        .list_albums_with_callback(&CallContext::new(), |albums| {
            seen += albums.len();
            ControlFlow::Break(())
        })
        .await
        .unwrap();

    assert_eq!(seen, 2);
}

#[tokio::test]
async fn test_find_album_is_cached_until_invalidated() {
    let service = Arc::new(FakeService::with_titles(&["Holidays"]));
    let client = client(service.clone(), false);
    let ctx = CallContext::new();

    let first = client.find_album(&ctx, "Holidays").await.unwrap();
    let second = client.find_album(&ctx, "Holidays").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(service.list_calls(), 1);

    client.invalidate_album(&ctx, "Holidays").await.unwrap();
    client.find_album(&ctx, "Holidays").await.unwrap();
    assert_eq!(service.list_calls(), 2);
}

#[tokio::test]
async fn test_find_missing_album() {
    let service = Arc::new(FakeService::with_titles(&["Holidays"]));
    let client = client(service, false);

    let err = client
        .find_album(&CallContext::new(), "Work")
        .await
        .unwrap_err();

    assert!(err.is_album_not_found());
    assert!(!err.is_cancellation());
}

#[tokio::test]
async fn test_create_album_reuses_existing_title() {
    let service = Arc::new(FakeService::with_titles(&["Holidays"]));
    let client = client(service.clone(), false);

    let album = client
        .create_album(&CallContext::new(), "Holidays")
        .await
        .unwrap();

    assert_eq!(album.id.as_deref(), Some("id-0"));
    assert_eq!(service.create_calls(), 0);
}

#[tokio::test]
async fn test_concurrent_creation_without_coordination_duplicates() {
    let service = Arc::new(FakeService::default());
    let client = client(service.clone(), false);
    let ctx = CallContext::new();

    let (a, b) = tokio::join!(
        client.create_album(&ctx, "Trip"),
        client.create_album(&ctx, "Trip")
    );

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(service.create_calls(), 2);
}

#[tokio::test]
async fn test_concurrent_creation_is_serialized_per_title() {
    let service = Arc::new(FakeService::default());
    let client = client(service.clone(), true);
    let ctx = CallContext::new();

    let (a, b) = tokio::join!(
        client.create_album(&ctx, "Trip"),
        client.create_album(&ctx, "Trip")
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(service.create_calls(), 1);
}

#[tokio::test]
async fn test_serialization_leaves_other_titles_alone() {
    let service = Arc::new(FakeService::default());
    let client = client(service.clone(), true);
    let ctx = CallContext::new();

    let (a, b) = tokio::join!(
        client.create_album(&ctx, "Trip"),
        client.create_album(&ctx, "Work")
    );

    assert_ne!(a.unwrap().id, b.unwrap().id);
    assert_eq!(service.create_calls(), 2);

    // Locks are dropped once released, so the same title can be created again.
    client.invalidate_album(&ctx, "Trip").await.unwrap();
    let again = client.create_album(&ctx, "Trip").await.unwrap();
    assert_eq!(again.title, "Trip");
    assert_eq!(service.create_calls(), 2);
}

#[tokio::test]
async fn test_cancelled_creation() {
    let service = Arc::new(FakeService::default());
    let client = client(service.clone(), true);
    let ctx = CallContext::new();
    ctx.cancel();

    let err = client.create_album(&ctx, "Trip").await.unwrap_err();

    assert!(err.is_cancellation());
    assert_eq!(service.create_calls(), 0);
}

#[tokio::test]
async fn test_add_media_to_library() {
    let service = Arc::new(FakeService::default());
    let client = client(service.clone(), false);

    let item = client
        .add_media_to_library(&CallContext::new(), &MediaUpload::new("tok-1", "beach.jpg"))
        .await
        .unwrap();

    assert_eq!(item.id, "media-1");
    assert_eq!(service.batches(), vec![(None, vec!["tok-1".to_string()])]);
}

#[tokio::test]
async fn test_add_media_to_album() {
    let service = Arc::new(FakeService::default());
    let client = client(service.clone(), false);

    client
        .add_media_to_album(
            &CallContext::new(),
            &MediaUpload::new("tok-2", "beach.jpg"),
            "album-9",
        )
        .await
        .unwrap();

    assert_eq!(
        service.batches(),
        vec![(Some("album-9".to_string()), vec!["tok-2".to_string()])]
    );
}

#[tokio::test]
async fn test_rejected_media_item() {
    let rejected = MediaItemResult {
        upload_token: "tok-1".to_string(),
        status: MediaItemStatus {
            code: 3,
            message: Some("invalid upload token".to_string()),
        },
        media_item: None,
    };
    let service = Arc::new(FakeService::default().respond_with(Ok(vec![rejected])));
    let client = client(service, false);

    let err = client
        .add_media_to_library(
            &CallContext::new(),
            &MediaUpload::new("tok-1", "/home/user/Pictures/beach.jpg"),
        )
        .await
        .unwrap_err();

    match err {
        CoreError::MediaCreationFailed { file_name, message } => {
            assert_eq!(file_name, "beach.jpg");
            assert!(message.contains("invalid upload token"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_media_result() {
    let service = Arc::new(FakeService::default().respond_with(Ok(vec![])));
    let client = client(service, false);

    let err = client
        .add_media_to_library(&CallContext::new(), &MediaUpload::new("tok-1", "a.jpg"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::MediaCreationFailed { .. }));
}

#[tokio::test]
async fn test_ok_status_without_item() {
    let service =
        Arc::new(FakeService::default().respond_with(Ok(vec![ok_result("tok-1", None)])));
    let client = client(service, false);

    let err = client
        .add_media_to_library(&CallContext::new(), &MediaUpload::new("tok-1", "a.jpg"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::MediaCreationFailed { .. }));
}

#[tokio::test]
async fn test_media_service_failure_propagates() {
    let service = Arc::new(FakeService::default().respond_with(Err(
        BridgeError::OperationFailed("connection reset".to_string()),
    )));
    let client = client(service, false);

    let err = client
        .add_media_to_library(&CallContext::new(), &MediaUpload::new("tok-1", "a.jpg"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Bridge(BridgeError::OperationFailed(_))));
}
