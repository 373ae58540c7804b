// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{listing_html, mount_listing, site, Harness};
use bbs_poller::config::settings::SurfaceSelectors;
use bbs_poller::domain::repositories::visited_link_repository::VisitedLinkRepository;
use bbs_poller::infrastructure::cache::visited_link_cache::VisitedLinkCache;
use bbs_poller::utils::errors::WorkerError;
use bbs_poller::workers::WorkerManager;
use std::time::Duration;
use tokio::sync::watch;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 轮询周期端到端测试
///
/// 列表页由模拟服务器提供，浏览器操作由记录型驱动记录

#[tokio::test]
async fn test_blocked_author_gets_one_reply_across_cycles() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        listing_html(&[("X", "/service/board/park/101"), ("Y", "/service/board/park/102")]),
    )
    .await;

    let harness = Harness::new().await;
    let (_tx, rx) = watch::channel(false);
    let mut worker = harness.worker(site("clien", &server, &["X"]), rx);
    let link = format!("{}/service/board/park/101", server.uri());

    let first = worker.run_cycle().await.unwrap();
    assert_eq!(first.entries, 2);
    assert_eq!(first.matched, 1);
    assert_eq!(first.acted, 1);
    assert!(harness.visited.contains(&link).await);

    let second = worker.run_cycle().await.unwrap();
    assert_eq!(second.acted, 0);
    assert_eq!(second.skipped_visited, 1);

    let selectors = SurfaceSelectors::default();
    assert_eq!(harness.factory.clicks(&selectors.comment_submit), 1);
    assert_eq!(harness.factory.launches(), 1);
    assert!(harness.factory.navigations().contains(&link));
}

#[tokio::test]
async fn test_visited_links_survive_restart() {
    let server = MockServer::start().await;
    mount_listing(&server, listing_html(&[("X", "/service/board/park/7")])).await;
    let link = format!("{}/service/board/park/7", server.uri());

    let harness = Harness::new().await;
    let (_tx, rx) = watch::channel(false);
    let report = harness
        .worker(site("clien", &server, &["X"]), rx)
        .run_once()
        .await
        .unwrap();
    assert_eq!(report.acted, 1);

    let reopened = VisitedLinkCache::open(harness.cache_path()).await.unwrap();
    assert!(reopened.contains(&link).await);
    assert_eq!(reopened.len().await, 1);
}

#[tokio::test]
async fn test_unmatched_listing_never_logs_in() {
    let server = MockServer::start().await;
    mount_listing(&server, listing_html(&[("Y", "/a"), ("Z", "/b")])).await;

    let harness = Harness::new().await;
    let (_tx, rx) = watch::channel(false);
    let report = harness
        .worker(site("clien", &server, &["X"]), rx)
        .run_once()
        .await
        .unwrap();

    assert_eq!(report.matched, 0);
    assert_eq!(harness.factory.launches(), 0);
    assert_eq!(harness.factory.quits(), 0);
    assert!(harness.visited.is_empty().await);
}

#[tokio::test]
async fn test_server_error_skips_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let harness = Harness::new().await;
    let (_tx, rx) = watch::channel(false);
    let result = harness
        .worker(site("clien", &server, &["X"]), rx)
        .run_once()
        .await;

    assert!(matches!(result, Err(WorkerError::Fetch(_))));
    assert_eq!(harness.factory.launches(), 0);
}

#[tokio::test]
async fn test_sites_share_one_visited_store() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_listing(&first, listing_html(&[("X", "/p/1")])).await;
    mount_listing(&second, listing_html(&[("W", "/p/2"), ("X", "/p/3")])).await;

    let harness = Harness::new().await;
    let mut manager = WorkerManager::new();
    manager.spawn(
        harness.worker(site("first", &first, &["X"]), manager.subscribe()),
        true,
    );
    manager.spawn(
        harness.worker(site("second", &second, &["W"]), manager.subscribe()),
        true,
    );
    assert_eq!(manager.worker_count(), 2);
    manager.join().await;

    assert!(harness.visited.contains(&format!("{}/p/1", first.uri())).await);
    assert!(harness.visited.contains(&format!("{}/p/2", second.uri())).await);
    assert!(!harness.visited.contains(&format!("{}/p/3", second.uri())).await);
    assert_eq!(harness.factory.launches(), 2);
    assert_eq!(harness.factory.quits(), 2);
}

#[tokio::test]
async fn test_shutdown_interrupts_sleep_and_releases_session() {
    let server = MockServer::start().await;
    mount_listing(&server, listing_html(&[("X", "/service/board/park/55")])).await;
    let link = format!("{}/service/board/park/55", server.uri());

    let harness = Harness::new().await;
    let mut manager = WorkerManager::new();
    manager.spawn(
        harness.worker(site("clien", &server, &["X"]), manager.subscribe()),
        false,
    );

    tokio::time::timeout(Duration::from_secs(10), async {
        while !harness.visited.contains(&link).await {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();

    manager.shutdown();
    tokio::time::timeout(Duration::from_secs(10), manager.join())
        .await
        .unwrap();

    assert_eq!(harness.factory.launches(), 1);
    assert_eq!(harness.factory.quits(), 1);
}
