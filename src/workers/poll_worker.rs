// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::site::SiteConfig;
use crate::domain::services::action_service::{ActOutcome, ActionService};
use crate::domain::services::extraction_service::ExtractionService;
use crate::domain::services::matching_service::MatchRules;
use crate::domain::services::session_service::SessionManager;
use crate::engines::traits::ListingSource;
use crate::utils::errors::WorkerError;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// 单轮轮询的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 提取到的条目数
    pub entries: usize,
    /// 命中规则的条目数
    pub matched: usize,
    /// 本轮提交回复的条目数
    pub acted: usize,
    /// 命中但已访问过的条目数
    pub skipped_visited: usize,
}

/// 轮询工作器
///
/// 每个站点一个：抓取列表页、提取条目、匹配规则、对未访问的命中条目执行回复，
/// 然后按抖动后的间隔休眠。关闭信号在每个步骤之间检查，
/// 退出时总会关闭浏览器会话。
pub struct PollWorker {
    site: SiteConfig,
    source: Arc<dyn ListingSource>,
    extractor: ExtractionService,
    rules: MatchRules,
    actions: Arc<ActionService>,
    session: SessionManager,
    shutdown: watch::Receiver<bool>,
}

impl PollWorker {
    pub fn new(
        site: SiteConfig,
        source: Arc<dyn ListingSource>,
        actions: Arc<ActionService>,
        session: SessionManager,
        shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<Self> {
        let extractor = ExtractionService::new(&site.endpoints.base_url)?;
        let rules = MatchRules::for_site(&site);
        Ok(Self {
            site,
            source,
            extractor,
            rules,
            actions,
            session,
            shutdown,
        })
    }

    pub fn alias(&self) -> &str {
        &self.site.alias
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// 执行一轮轮询
    ///
    /// # 返回值
    ///
    /// * `Ok(CycleReport)` - 本轮统计，收到关闭信号时可能提前结束
    /// * `Err(WorkerError)` - 抓取失败，或登录/回复失败导致本轮放弃
    pub async fn run_cycle(&mut self) -> Result<CycleReport, WorkerError> {
        counter!("bbs_poller_cycles_total", "site" => self.site.alias.clone()).increment(1);
        let mut report = CycleReport::default();

        let html = match self.source.fetch(&self.site.endpoints.board_url).await {
            Ok(html) => html,
            Err(e) => {
                counter!("bbs_poller_fetch_failures_total", "site" => self.site.alias.clone())
                    .increment(1);
                return Err(e.into());
            }
        };

        let entries = self.extractor.extract(&html);
        report.entries = entries.len();
        debug!("[{}] Extracted {} entries", self.site.alias, entries.len());

        for entry in entries {
            if self.is_shutdown() {
                info!("[{}] Shutdown requested, ending cycle early", self.site.alias);
                break;
            }
            if !self.rules.matches(&entry, &self.site) {
                continue;
            }

            report.matched += 1;
            counter!("bbs_poller_matches_total", "site" => self.site.alias.clone()).increment(1);
            info!(
                "[{}] Matched entry by {} at {}",
                self.site.alias, entry.author, entry.link
            );

            if self.actions.is_visited(&entry.link).await {
                report.skipped_visited += 1;
                continue;
            }

            if !self.session.is_authenticated() {
                self.session.open(&self.site.credentials).await?;
            }

            match self.actions.act(&self.session, &entry.link).await {
                Ok(ActOutcome::Posted) => report.acted += 1,
                Ok(ActOutcome::AlreadyVisited) => report.skipped_visited += 1,
                Err(e) => {
                    // Treat the browser state as unknown and log in again next time.
                    self.session.invalidate().await;
                    return Err(e.into());
                }
            }
        }

        Ok(report)
    }

    /// 休眠，收到关闭信号时提前返回 `true`
    async fn sleep_or_shutdown(&mut self, delay: Duration) -> bool {
        // A dropped sender also ends the wait.
        tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = self.shutdown.wait_for(|stop| *stop) => true,
        }
    }

    async fn poll_loop(&mut self) {
        while !self.is_shutdown() {
            match self.run_cycle().await {
                Ok(report) => info!(
                    "[{}] Cycle done: {} entries, {} matched, {} replied, {} already visited",
                    self.site.alias,
                    report.entries,
                    report.matched,
                    report.acted,
                    report.skipped_visited
                ),
                Err(WorkerError::Fetch(e)) => {
                    warn!("[{}] Failed to fetch listing: {}", self.site.alias, e)
                }
                Err(e) => error!("[{}] Cycle abandoned: {}", self.site.alias, e),
            }

            let delay = self.site.polling.next_delay(&mut rand::rng());
            info!("[{}] Sleeping for {}s", self.site.alias, delay.as_secs());
            if self.sleep_or_shutdown(delay).await {
                break;
            }
        }
    }

    /// 运行轮询循环直到收到关闭信号
    pub async fn run(mut self) {
        info!("[{}] Poll worker started", self.site.alias);
        self.poll_loop().await;
        self.session.close().await;
        info!("[{}] Poll worker stopped", self.site.alias);
    }

    /// 只执行一轮，然后关闭会话
    pub async fn run_once(mut self) -> Result<CycleReport, WorkerError> {
        let result = self.run_cycle().await;
        self.session.close().await;
        result
    }
}
