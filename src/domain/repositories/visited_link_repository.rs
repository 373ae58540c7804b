// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::CacheError;
use async_trait::async_trait;

/// 已访问链接仓库特质
///
/// 成员关系单调增长：一旦加入，正常运行中不会被移除
#[async_trait]
pub trait VisitedLinkRepository: Send + Sync {
    /// 链接是否已经处理过
    async fn contains(&self, link: &str) -> bool;

    /// 记录链接并在返回前持久化
    ///
    /// 重复添加不产生任何可观察的变化。持久化失败时内存中的记录仍然保留，
    /// 返回 `Err` 供调用方记录日志。
    async fn add(&self, link: &str) -> Result<(), CacheError>;

    /// 已记录的链接数量
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
