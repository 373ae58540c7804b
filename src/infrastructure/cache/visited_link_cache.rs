// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::visited_link_repository::VisitedLinkRepository;
use crate::utils::errors::CacheError;
use async_trait::async_trait;
use metrics::counter;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{error, info};

/// 基于本地文件的已访问链接缓存
///
/// 整个集合以JSON数组保存在单个文件中。每次新增都会先写入临时文件再原子替换，
/// 读-改-写由互斥锁串行化，多个站点的 worker 可以共享同一个实例。
pub struct VisitedLinkCache {
    path: PathBuf,
    links: Mutex<BTreeSet<String>>,
}

impl VisitedLinkCache {
    /// 打开缓存
    ///
    /// 文件不存在时返回空集合；文件存在但无法读取或解析时返回错误，调用方应中止启动
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();

        let links = match fs::read(&path).await {
            Ok(data) => serde_json::from_slice::<BTreeSet<String>>(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No visited link store at {}, starting empty", path.display());
                BTreeSet::new()
            }
            Err(e) => return Err(CacheError::Io(e)),
        };

        info!(
            "Loaded {} visited links from {}",
            links.len(),
            path.display()
        );

        Ok(Self {
            path,
            links: Mutex::new(links),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, links: &BTreeSet<String>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut tmp_path = self.path.as_os_str().to_owned();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let data = serde_json::to_vec_pretty(links)?;
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl VisitedLinkRepository for VisitedLinkCache {
    async fn contains(&self, link: &str) -> bool {
        self.links.lock().await.contains(link)
    }

    async fn add(&self, link: &str) -> Result<(), CacheError> {
        let mut links = self.links.lock().await;
        if !links.insert(link.to_string()) {
            return Ok(());
        }

        if let Err(e) = self.persist(&links).await {
            counter!("bbs_poller_cache_persist_failures_total").increment(1);
            error!(
                "Failed to persist visited link store {}: {}. {} is kept in memory only",
                self.path.display(),
                e,
                link
            );
            return Err(e);
        }
        Ok(())
    }

    async fn len(&self) -> usize {
        self.links.lock().await.len()
    }
}
