//! `HttpFetcher` against a local mock server.

use std::time::Duration;

use micro_common::{FetchError, Fetcher, HttpFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_text_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/a.css"))
        .and(header("User-Agent", "micro-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body { margin: 0 }"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new("micro-test", Duration::from_secs(5)).expect("client");
    let text = fetcher
        .fetch_text(&format!("{}/app/a.css", server.uri()))
        .await
        .expect("fetch succeeds");

    assert_eq!(text, "body { margin: 0 }");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::with_defaults().expect("client");
    let err = fetcher
        .fetch_text(&format!("{}/missing.js", server.uri()))
        .await
        .expect_err("404 must fail");

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}
