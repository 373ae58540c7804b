// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器管理器测试模块
///
/// 验证关闭信号的传播以及单轮模式下的自然退出

#[cfg(test)]
mod tests {
    use crate::integration::helpers::{listing_html, mount_listing, site, Harness};
    use bbs_poller::workers::WorkerManager;
    use std::time::Duration;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_manager_without_workers() {
        let mut manager = WorkerManager::new();
        assert_eq!(manager.worker_count(), 0);

        manager.shutdown();
        manager.join().await;
    }

    #[tokio::test]
    async fn test_subscribers_observe_shutdown() {
        let manager = WorkerManager::new();
        let mut rx = manager.subscribe();
        assert!(!*rx.borrow());

        manager.shutdown();

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_returns_when_single_cycles_finish() {
        let server = MockServer::start().await;
        mount_listing(&server, listing_html(&[("X", "/p/1")])).await;

        let harness = Harness::new().await;
        let mut manager = WorkerManager::new();
        manager.spawn(
            harness.worker(site("clien", &server, &["X"]), manager.subscribe()),
            true,
        );

        tokio::time::timeout(Duration::from_secs(10), manager.wait_for_shutdown())
            .await
            .unwrap();

        assert_eq!(manager.worker_count(), 0);
        assert_eq!(harness.factory.quits(), 1);
    }
}
