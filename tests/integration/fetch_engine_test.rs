// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bbs_poller::engines::fetch_engine::FetchEngine;
use bbs_poller::engines::traits::{EngineError, ListingSource};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/board"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>listing</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let engine = FetchEngine::new(Duration::from_secs(5)).unwrap();
    let body = engine
        .fetch(&format!("{}/board", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "<html>listing</html>");
}

#[tokio::test]
async fn test_fetch_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = FetchEngine::new(Duration::from_secs(5)).unwrap();
    let err = engine.fetch(&server.uri()).await.unwrap_err();

    assert!(matches!(err, EngineError::Status(503)));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let engine = FetchEngine::new(Duration::from_millis(200)).unwrap();
    let err = engine.fetch(&server.uri()).await.unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_fetch_unreachable_host() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri = format!("http://127.0.0.1:{}/board", port);

    let engine = FetchEngine::new(Duration::from_secs(2)).unwrap();
    let err = engine.fetch(&uri).await.unwrap_err();

    assert!(matches!(err, EngineError::RequestFailed(_)));
}
