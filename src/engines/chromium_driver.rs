// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{BrowserDriver, DriverFactory, EngineError};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn browser_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::Browser(e.to_string())
}

/// Chromium 浏览器驱动工厂
///
/// 基于chromiumoxide。设置了远程调试地址时连接已有的浏览器，否则在本地启动一个新实例
#[derive(Debug, Clone)]
pub struct ChromiumDriverFactory {
    remote_url: Option<String>,
    headless: bool,
    request_timeout: Duration,
}

impl ChromiumDriverFactory {
    pub fn new(remote_url: Option<String>, headless: bool, request_timeout: Duration) -> Self {
        Self {
            remote_url,
            headless,
            request_timeout,
        }
    }

    /// 从环境变量读取 `CHROMIUM_REMOTE_DEBUGGING_URL` 与 `BBS_POLLER_HEADFUL`
    pub fn from_env(request_timeout: Duration) -> Self {
        let remote_url = std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok();
        let headless = std::env::var("BBS_POLLER_HEADFUL").unwrap_or_default() != "true";
        Self::new(remote_url, headless, request_timeout)
    }
}

#[async_trait]
impl DriverFactory for ChromiumDriverFactory {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, EngineError> {
        let (browser, mut handler) = if let Some(ref url) = self.remote_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url).await.map_err(browser_error)?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(self.request_timeout)
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage");
            if !self.headless {
                builder = builder.with_head();
            }

            Browser::launch(builder.build().map_err(EngineError::Browser)?)
                .await
                .map_err(browser_error)?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(browser_error(e));
            }
        };

        Ok(Box::new(ChromiumDriver {
            browser: Mutex::new(Some(browser)),
            page,
            handler_task: Mutex::new(Some(handler_task)),
            remote: self.remote_url.is_some(),
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 单个浏览器页面上的驱动
pub struct ChromiumDriver {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler_task: Mutex<Option<JoinHandle<()>>>,
    remote: bool,
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> Result<(), EngineError> {
        self.page.goto(url).await.map_err(browser_error)?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), EngineError> {
        tokio::time::timeout(timeout, async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| EngineError::Timeout(selector.to_string()))
    }

    async fn click(&self, selector: &str) -> Result<(), EngineError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| EngineError::ElementNotFound(selector.to_string()))?
            .click()
            .await
            .map_err(browser_error)?;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), EngineError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| EngineError::ElementNotFound(selector.to_string()))?;
        element.focus().await.map_err(browser_error)?;
        element.type_str(text).await.map_err(browser_error)?;
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool, EngineError> {
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn quit(&self) -> Result<(), EngineError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        if let Err(e) = self.page.clone().close().await {
            debug!("Failed to close page: {}", e);
        }

        // A remote browser is shared with whoever started it; only our page goes away.
        if !self.remote {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }
        }

        if let Some(task) = self.handler_task.lock().await.take() {
            task.abort();
        }
        Ok(())
    }
}
