// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bbs_poller::config::settings::{SurfaceSelectors, Timings};
use bbs_poller::domain::models::site::{Credentials, PollingInterval, SiteConfig, SiteEndpoints};
use bbs_poller::domain::services::action_service::ActionService;
use bbs_poller::domain::services::session_service::SessionManager;
use bbs_poller::engines::fetch_engine::FetchEngine;
use bbs_poller::engines::recording_driver::RecordingDriverFactory;
use bbs_poller::engines::traits::ListingSource;
use bbs_poller::infrastructure::cache::visited_link_cache::VisitedLinkCache;
use bbs_poller::workers::PollWorker;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LISTING_PATH: &str = "/service/board/park";

/// 生成列表页，每个条目为 (作者, 链接)
pub fn listing_html(entries: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><body><div class=\"list_content\">");
    for (author, href) in entries {
        html.push_str(&format!(
            r#"<div class="list_item symph_row">
                <div class="list_title"><a href="{}" class="list_subject">post</a></div>
                <div class="list_author"><span class="nickname" title="{}">{}</span></div>
            </div>"#,
            href, author, author
        ));
    }
    html.push_str("</div></body></html>");
    html
}

pub async fn mount_listing(server: &MockServer, html: String) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

pub fn site(alias: &str, server: &MockServer, blocked: &[&str]) -> SiteConfig {
    let mut site = SiteConfig::new(
        alias,
        Credentials {
            id: format!("{}-user", alias),
            pw: "secret".to_string(),
        },
    );
    for author in blocked {
        site.block_author(*author);
    }
    site.endpoints = SiteEndpoints {
        board_url: format!("{}{}", server.uri(), LISTING_PATH),
        base_url: server.uri(),
        login_url: format!("{}/service/", server.uri()),
    };
    site.polling = PollingInterval {
        median: 60,
        lower_limit: 0,
        upper_limit: 0,
    };
    site
}

/// 共享缓存、抓取引擎和记录型驱动的测试环境
#[allow(dead_code)]
pub struct Harness {
    pub dir: TempDir,
    pub visited: Arc<VisitedLinkCache>,
    pub factory: RecordingDriverFactory,
    pub source: Arc<dyn ListingSource>,
    pub actions: Arc<ActionService>,
}

impl Harness {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let visited = Arc::new(
            VisitedLinkCache::open(dir.path().join("visited_link_cache_entries.json"))
                .await
                .unwrap(),
        );
        let source: Arc<dyn ListingSource> =
            Arc::new(FetchEngine::new(Duration::from_secs(5)).unwrap());
        let actions = Arc::new(ActionService::new(
            visited.clone(),
            SurfaceSelectors::default(),
            Timings::immediate(),
            "   ",
        ));

        Self {
            dir,
            visited,
            factory: RecordingDriverFactory::new(),
            source,
            actions,
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.visited.path().to_path_buf()
    }

    pub fn worker(&self, site: SiteConfig, shutdown: watch::Receiver<bool>) -> PollWorker {
        let session = SessionManager::new(
            Arc::new(self.factory.clone()),
            SurfaceSelectors::default(),
            Timings::immediate(),
            site.endpoints.login_url.clone(),
        );
        PollWorker::new(site, self.source.clone(), self.actions.clone(), session, shutdown)
            .unwrap()
    }
}
