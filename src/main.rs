// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use bbs_poller::config::settings::{Settings, DEFAULT_CONFIG_PATH};
use bbs_poller::domain::repositories::visited_link_repository::VisitedLinkRepository;
use bbs_poller::domain::services::action_service::ActionService;
use bbs_poller::domain::services::session_service::SessionManager;
use bbs_poller::engines::chromium_driver::ChromiumDriverFactory;
use bbs_poller::engines::fetch_engine::FetchEngine;
use bbs_poller::engines::traits::{DriverFactory, ListingSource};
use bbs_poller::infrastructure::cache::visited_link_cache::VisitedLinkCache;
use bbs_poller::utils::telemetry;
use bbs_poller::workers::{PollWorker, WorkerManager};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

/// 监控论坛列表页并自动回复被屏蔽作者的帖子
#[derive(Parser, Debug)]
#[command(name = "bbs-poller", version, about)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// 只校验配置并列出站点
    #[arg(long)]
    check: bool,

    /// 每个站点只执行一轮
    #[arg(long)]
    once: bool,
}

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动轮询
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    let cli = Cli::parse();
    info!("Starting bbs-poller...");

    // 2. Load configuration
    let settings = Settings::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    info!("Configuration loaded: {} site(s)", settings.sites.len());

    if cli.check {
        for (alias, site) in &settings.sites {
            println!("{}\t{}", alias, site.endpoints.board_url);
        }
        return Ok(());
    }

    if let Some(listen) = settings.metrics.listen.as_deref() {
        bbs_poller::infrastructure::metrics::init_metrics(listen);
    }

    // 3. Open the visited link store
    let visited: Arc<dyn VisitedLinkRepository> = Arc::new(
        VisitedLinkCache::open(&settings.cache.path)
            .await
            .with_context(|| format!("Failed to open visited link store {}", settings.cache.path))?,
    );
    info!("Visited link store ready with {} entries", visited.len().await);

    // 4. Engines
    let source: Arc<dyn ListingSource> = Arc::new(FetchEngine::new(settings.timings.fetch_timeout)?);
    let drivers: Arc<dyn DriverFactory> =
        Arc::new(ChromiumDriverFactory::from_env(settings.timings.login_wait));
    let actions = Arc::new(ActionService::new(
        visited,
        settings.selectors.clone(),
        settings.timings,
        settings.reply.text.clone(),
    ));

    // 5. Start one worker per site
    let mut worker_manager = WorkerManager::new();
    for site in settings.sites.values() {
        let session = SessionManager::new(
            drivers.clone(),
            settings.selectors.clone(),
            settings.timings,
            site.endpoints.login_url.clone(),
        );
        let worker = PollWorker::new(
            site.clone(),
            source.clone(),
            actions.clone(),
            session,
            worker_manager.subscribe(),
        )?;
        worker_manager.spawn(worker, cli.once);
    }
    info!("Started {} poll worker(s)", worker_manager.worker_count());

    worker_manager.wait_for_shutdown().await;
    info!("bbs-poller stopped");
    Ok(())
}
