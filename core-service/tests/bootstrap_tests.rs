//! Building a client from configuration, with the HTTP transport mocked.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::CallContext;
use bytes::Bytes;
use core_service::{CoreError, GalleryClient, GalleryConfig};
use mockall::mock;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        async fn execute_with_retry(
            &self,
            request: HttpRequest,
            policy: RetryPolicy,
        ) -> BridgeResult<HttpResponse>;
    }
}

fn ok(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

#[tokio::test]
async fn test_config_drives_connector_and_resolver() {
    let mut http = MockHttpClient::new();
    http.expect_execute_with_retry()
        .withf(|request, policy| {
            request.method == HttpMethod::Get
                && request.url == "http://localhost:8080/v1/albums?pageSize=20"
                && request.headers.get("Authorization").map(String::as_str)
                    == Some("Bearer secret")
                && policy.max_attempts == 5
        })
        .times(1)
        .returning(|_, _| Ok(ok(r#"{"albums":[{"id":"a1","title":"Holidays"}]}"#)));

    let config = GalleryConfig::builder()
        .access_token("secret")
        .api_base_url("http://localhost:8080/v1/")
        .page_size(20)
        .retry_policy(RetryPolicy {
            max_attempts: 5,
            ..RetryPolicy::default()
        })
        .http_client(Arc::new(http))
        .build()
        .unwrap();

    let client = GalleryClient::from_config(&config).unwrap();
    assert_eq!(client.resolver().options().page_size, 20);

    let ctx = CallContext::new();
    let album = client.find_album(&ctx, "Holidays").await.unwrap();
    assert_eq!(album.id.as_deref(), Some("a1"));

    // Served from the album cache; the mock allows a single request.
    client.find_album(&ctx, "Holidays").await.unwrap();
}

#[tokio::test]
async fn test_bootstrap_creates_album_once() {
    let mut http = MockHttpClient::new();
    http.expect_execute_with_retry()
        .withf(|request, _| request.method == HttpMethod::Get)
        .times(1)
        .returning(|_, _| Ok(ok("{}")));
    http.expect_execute_with_retry()
        .withf(|request, policy| {
            request.method == HttpMethod::Post
                && request.url.ends_with("/albums")
                && *policy == RetryPolicy::single_attempt()
        })
        .times(1)
        .returning(|_, _| Ok(ok(r#"{"id":"new-1","title":"Trip"}"#)));

    let client = GalleryClient::bootstrap(
        GalleryConfig::builder()
            .access_token("secret")
            .album_cache_ttl(Duration::from_secs(60))
            .serialize_album_creation(true)
            .http_client(Arc::new(http)),
    )
    .unwrap();

    let album = client
        .create_album(&CallContext::new(), "Trip")
        .await
        .unwrap();
    assert_eq!(album.id.as_deref(), Some("new-1"));
}

#[test]
fn test_bootstrap_without_token() {
    let result = GalleryClient::bootstrap(
        GalleryConfig::builder().http_client(Arc::new(MockHttpClient::new())),
    );

    assert!(matches!(result, Err(CoreError::Config(_))));
}

#[test]
fn test_from_config_rejects_invalid_config() {
    let mut config = GalleryConfig::builder()
        .access_token("secret")
        .http_client(Arc::new(MockHttpClient::new()))
        .build()
        .unwrap();
    config.page_size = 0;

    let result = GalleryClient::from_config(&config);

    assert!(matches!(result, Err(CoreError::InitializationFailed(_))));
}
