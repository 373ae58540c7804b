// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bbs_poller::domain::repositories::visited_link_repository::VisitedLinkRepository;
use bbs_poller::infrastructure::cache::visited_link_cache::VisitedLinkCache;
use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_concurrent_adds_are_all_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visited.json");
    let cache = Arc::new(VisitedLinkCache::open(&path).await.unwrap());

    let mut handles = Vec::new();
    for worker in 0..4 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                cache
                    .add(&format!("https://example.com/{}/{}", worker, i))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len().await, 40);

    let stored: BTreeSet<String> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(stored.len(), 40);
    assert!(stored.contains("https://example.com/3/9"));
}

#[tokio::test]
async fn test_store_is_a_json_array_of_links() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("visited.json");
    let cache = VisitedLinkCache::open(&path).await.unwrap();

    cache.add("https://example.com/b").await.unwrap();
    cache.add("https://example.com/a").await.unwrap();

    let stored: Vec<String> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(stored, vec!["https://example.com/a", "https://example.com/b"]);
}

#[tokio::test]
async fn test_existing_store_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visited.json");
    std::fs::write(&path, r#"["https://example.com/old"]"#).unwrap();

    let cache = VisitedLinkCache::open(&path).await.unwrap();

    assert!(cache.contains("https://example.com/old").await);
    assert!(!cache.contains("https://example.com/new").await);
}
