use std::path::PathBuf;
use url::Url;
use wikibooks_recipes::url_to_text::fetchers::{CachedFetcher, PageSource, RequestFetcher};
use wikibooks_recipes::CrawlError;

fn cache_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "wikibooks-recipes-cache-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn page_url(base: &str, path: &str) -> Url {
    Url::parse(&format!("{base}{path}")).unwrap()
}

#[tokio::test]
async fn test_second_fetch_is_served_from_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/wiki/Cookbook:Tea")
        .with_status(200)
        .with_body("<html><body>Tea</body></html>")
        .expect(1)
        .create_async()
        .await;

    let dir = cache_dir("hit");
    let fetcher = CachedFetcher::new(RequestFetcher::new(None, None).unwrap(), &dir);
    let url = page_url(&server.url(), "/wiki/Cookbook:Tea");

    let first = fetcher.fetch(&url).await.unwrap();
    let second = fetcher.fetch(&url).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, "<html><body>Tea</body></html>");
    assert_eq!(second, first);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_failed_responses_are_not_cached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/wiki/Cookbook:Gone")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let dir = cache_dir("miss");
    let fetcher = CachedFetcher::new(RequestFetcher::new(None, None).unwrap(), &dir);
    let url = page_url(&server.url(), "/wiki/Cookbook:Gone");

    for _ in 0..2 {
        match fetcher.fetch(&url).await {
            Err(CrawlError::StatusError { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    mock.assert_async().await;
    assert!(!dir.exists() || std::fs::read_dir(&dir).unwrap().count() == 0);
}

#[tokio::test]
async fn test_request_fetcher_reports_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = RequestFetcher::new(None, Some("recipes-test/1.0")).unwrap();
    let result = fetcher.fetch(&page_url(&server.url(), "/missing")).await;

    assert!(matches!(
        result,
        Err(CrawlError::StatusError { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_request_fetcher_sends_user_agent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/page")
        .match_header("user-agent", "recipes-test/1.0")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let fetcher = RequestFetcher::new(None, Some("recipes-test/1.0"))
        .unwrap()
        .with_random_delay(std::time::Duration::from_millis(5));
    let body = fetcher.fetch(&page_url(&server.url(), "/page")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(body, "ok");
}
