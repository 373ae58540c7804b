// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{SurfaceSelectors, Timings};
use crate::domain::repositories::visited_link_repository::VisitedLinkRepository;
use crate::domain::services::session_service::SessionManager;
use crate::utils::errors::SessionError;
use metrics::counter;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// 对单个链接执行动作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActOutcome {
    /// 链接已在缓存中，没有执行任何操作
    AlreadyVisited,
    /// 已提交回复
    Posted,
}

/// 动作服务
///
/// 在已登录会话中打开文章并提交回复。
/// 只有提交成功后才把链接写入已访问缓存，中途失败的链接会在下一轮重试。
pub struct ActionService {
    visited: Arc<dyn VisitedLinkRepository>,
    selectors: SurfaceSelectors,
    timings: Timings,
    reply_text: String,
}

impl ActionService {
    pub fn new(
        visited: Arc<dyn VisitedLinkRepository>,
        selectors: SurfaceSelectors,
        timings: Timings,
        reply_text: impl Into<String>,
    ) -> Self {
        Self {
            visited,
            selectors,
            timings,
            reply_text: reply_text.into(),
        }
    }

    pub async fn is_visited(&self, link: &str) -> bool {
        self.visited.contains(link).await
    }

    /// 对链接执行回复
    ///
    /// # 参数
    ///
    /// * `session` - 已登录的会话
    /// * `link` - 文章的绝对地址
    ///
    /// # 返回值
    ///
    /// * `Ok(ActOutcome)` - 已访问则跳过，否则提交回复
    /// * `Err(SessionError)` - 导航、等待或点击失败，链接不会被记录
    pub async fn act(
        &self,
        session: &SessionManager,
        link: &str,
    ) -> Result<ActOutcome, SessionError> {
        if self.is_visited(link).await {
            debug!("Skipping visited link {}", link);
            return Ok(ActOutcome::AlreadyVisited);
        }

        let driver = session.driver()?;
        let selectors = &self.selectors;

        info!("Replying to {}", link);
        let result = async {
            driver.navigate(link).await?;
            driver
                .wait_for(&selectors.comment_textarea, self.timings.action_wait)
                .await?;
            driver.click(&selectors.comment_open).await?;
            sleep(self.timings.editor_settle).await;
            sleep(self.timings.input_pause).await;
            driver
                .type_text(&selectors.comment_textarea, &self.reply_text)
                .await?;
            sleep(self.timings.input_pause).await;
            driver.click(&selectors.comment_submit).await?;
            Ok::<(), SessionError>(())
        }
        .await;

        if let Err(e) = result {
            counter!("bbs_poller_action_failures_total").increment(1);
            return Err(e);
        }
        counter!("bbs_poller_actions_total").increment(1);

        if let Err(e) = self.visited.add(link).await {
            warn!(
                "Reply to {} was posted but could not be recorded: {}",
                link, e
            );
        }
        Ok(ActOutcome::Posted)
    }
}
