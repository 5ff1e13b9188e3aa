//! Integration tests for page fetching
//!
//! These tests use wiremock to stand up local HTTP servers and drive the
//! fetcher, cache, and batch scheduler end-to-end.

use krio_fetch::config::{BatchConfig, CacheConfig, Config, FetcherConfig};
use krio_fetch::fetcher::{BatchFetcher, PageFetcher};
use krio_fetch::{ErrorKind, FetchError, ValidationError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html>
<head><title>Field Notes</title><script>var tracking = 1;</script></head>
<body>
  <nav>Home | About</nav>
  <article><h1>Heading</h1><p>Moss grows on the north side.</p></article>
  <footer>Copyright</footer>
</body>
</html>"#;

/// Creates a test configuration that trusts the local mock server
fn create_test_config(max_retries: u32) -> Config {
    Config {
        fetcher: FetcherConfig {
            user_agent: "TestBot/1.0".to_string(),
            timeout_secs: 5,
            max_retries,
            retry_delay_ms: 10, // Very short for testing
            trusted_hosts: vec!["127.0.0.1".to_string()],
        },
        cache: CacheConfig {
            enabled: true,
            ttl_secs: 60,
        },
        batch: BatchConfig { max_concurrency: 4 },
    }
}

#[tokio::test]
async fn test_fetch_extracts_title_and_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(&create_test_config(0).fetcher).unwrap();
    let url = format!("{}/article", mock_server.uri());

    let document = fetcher.fetch_page(&url).await.unwrap();

    assert_eq!(document.url, url);
    assert_eq!(document.title, "Field Notes");
    assert!(document.content.contains("Moss grows on the north side."));
    assert!(!document.content.contains("tracking"));
    assert!(!document.content.contains("Home | About"));
    assert!(!document.content.contains("Copyright"));
}

#[tokio::test]
async fn test_server_error_retried_until_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(&create_test_config(2).fetcher).unwrap();
    let url = format!("{}/broken", mock_server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.attempts(), Some(3));
    match err {
        FetchError::Network { message, .. } => assert!(message.contains("500")),
        other => panic!("expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let mock_server = MockServer::start().await;

    // First two requests fail, later ones fall through to the healthy mock
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(&create_test_config(3).fetcher).unwrap();
    let url = format!("{}/flaky", mock_server.uri());

    let document = fetcher.fetch_page(&url).await.unwrap();
    assert_eq!(document.title, "Field Notes");
}

#[tokio::test]
async fn test_empty_page_reports_empty_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Blank</title></head><body><script>x()</script></body></html>",
        ))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(&create_test_config(1).fetcher).unwrap();
    let url = format!("{}/empty", mock_server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyContent);
    assert_eq!(err.attempts(), Some(2));
}

#[tokio::test]
async fn test_untrusted_loopback_rejected_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(3);
    config.fetcher.trusted_hosts.clear();
    let fetcher = PageFetcher::new(&config.fetcher).unwrap();
    let url = format!("{}/article", mock_server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::Validation(ValidationError::PrivateAddress(_))
    ));
    assert_eq!(err.attempts(), None);
}

#[tokio::test]
async fn test_redirect_to_private_address_blocked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hop"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "http://10.0.0.1/internal"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(&create_test_config(3).fetcher).unwrap();
    let url = format!("{}/hop", mock_server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::Validation(ValidationError::PrivateAddress(_))
    ));
    assert_eq!(err.attempts(), None);
}

#[tokio::test]
async fn test_redirect_within_trusted_host_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/article", mock_server.uri()).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(&create_test_config(0).fetcher).unwrap();
    let url = format!("{}/old", mock_server.uri());

    let document = fetcher.fetch_page(&url).await.unwrap();

    // The document keeps the requested URL
    assert_eq!(document.url, url);
    assert_eq!(document.title, "Field Notes");
}

#[tokio::test]
async fn test_fetch_one_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = BatchFetcher::from_config(&create_test_config(0)).unwrap();
    let url = format!("{}/article", mock_server.uri());

    let first = fetcher.fetch_one(&url).await.unwrap();
    let second = fetcher.fetch_one(&url).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.cache_size(), 1);
}

#[tokio::test]
async fn test_cache_disabled_always_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(0);
    config.cache.enabled = false;
    let fetcher = BatchFetcher::from_config(&config).unwrap();
    let url = format!("{}/article", mock_server.uri());

    fetcher.fetch_one(&url).await.unwrap();
    fetcher.fetch_one(&url).await.unwrap();

    assert!(fetcher.cache().is_none());
    assert_eq!(fetcher.cache_size(), 0);
}

#[tokio::test]
async fn test_batch_with_mixed_outcomes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = BatchFetcher::from_config(&create_test_config(1)).unwrap();
    let urls = vec![
        format!("{}/good", mock_server.uri()),
        format!("{}/missing", mock_server.uri()),
        "http://10.0.0.1/internal".to_string(),
        "not a url".to_string(),
    ];

    let result = fetcher.fetch_all(&urls).await;

    assert_eq!(result.len(), 4);
    assert_eq!(result.success_count(), 1);

    let outcomes: Vec<_> = result.iter().collect();
    assert_eq!(outcomes[0].url, urls[0]);
    assert!(outcomes[0].is_success());
    assert_eq!(outcomes[1].error().map(|e| e.kind()), Some(ErrorKind::Network));
    assert_eq!(
        outcomes[2].error().map(|e| e.kind()),
        Some(ErrorKind::Validation)
    );
    assert_eq!(
        outcomes[3].error().map(|e| e.kind()),
        Some(ErrorKind::Validation)
    );

    let by_kind = result.failures_by_kind();
    assert_eq!(by_kind.get(&ErrorKind::Validation), Some(&2));
    assert_eq!(by_kind.get(&ErrorKind::Network), Some(&1));

    // Only the success was cached
    assert_eq!(fetcher.cache_size(), 1);
}
