// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{SurfaceSelectors, Timings};
use crate::domain::models::site::Credentials;
use crate::engines::traits::{BrowserDriver, DriverFactory};
use crate::utils::errors::SessionError;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Closed,
}

/// 会话管理器
///
/// 持有一个已登录的浏览器会话。会话在第一次需要时打开，
/// 失败或被作废后回到未登录状态，下一次需要时重新登录。
/// `close` 之后进入终止状态，驱动保证只被释放一次。
pub struct SessionManager {
    factory: Arc<dyn DriverFactory>,
    selectors: SurfaceSelectors,
    timings: Timings,
    login_url: String,
    driver: Option<Box<dyn BrowserDriver>>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(
        factory: Arc<dyn DriverFactory>,
        selectors: SurfaceSelectors,
        timings: Timings,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            selectors,
            timings,
            login_url: login_url.into(),
            driver: None,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// 已登录会话的驱动
    pub fn driver(&self) -> Result<&dyn BrowserDriver, SessionError> {
        match (self.state, self.driver.as_deref()) {
            (SessionState::Authenticated, Some(driver)) => Ok(driver),
            (SessionState::Closed, _) => Err(SessionError::Closed),
            _ => Err(SessionError::NotAuthenticated),
        }
    }

    /// 启动浏览器并登录
    ///
    /// 已有的会话会先被释放。登录过程中任何一步失败都会释放驱动并回到未登录状态，
    /// 错误返回给调用方，由调用方决定放弃本轮。
    ///
    /// # 参数
    ///
    /// * `credentials` - 站点登录凭据
    pub async fn open(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        self.release_driver().await;

        self.state = SessionState::Authenticating;
        info!(
            "Logging in to {} as {} using {} driver",
            self.login_url,
            credentials.id,
            self.factory.name()
        );

        match self.factory.launch().await {
            Ok(driver) => self.driver = Some(driver),
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                return Err(e.into());
            }
        }

        match self.login(credentials).await {
            Ok(()) => {
                self.state = SessionState::Authenticated;
                counter!("bbs_poller_logins_total").increment(1);
                info!("Logged in as {}", credentials.id);
                Ok(())
            }
            Err(e) => {
                warn!("Login as {} failed: {}", credentials.id, e);
                self.release_driver().await;
                self.state = SessionState::Unauthenticated;
                Err(e)
            }
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let driver = self
            .driver
            .as_deref()
            .ok_or(SessionError::NotAuthenticated)?;
        let selectors = &self.selectors;

        driver.navigate(&self.login_url).await?;
        driver
            .wait_for(&selectors.login_form, self.timings.login_wait)
            .await?;
        driver
            .type_text(&selectors.user_id_input, &credentials.id)
            .await?;
        driver
            .type_text(&selectors.password_input, &credentials.pw)
            .await?;
        driver.click(&selectors.login_submit).await?;

        // The site may ask whether to register this device.
        tokio::time::sleep(self.timings.login_modal_wait).await;
        if driver.exists(&selectors.device_confirm).await? {
            driver.click(&selectors.device_confirm).await?;
            debug!("Dismissed device registration prompt");
            tokio::time::sleep(self.timings.modal_close_wait).await;
        }
        Ok(())
    }

    /// 作废当前会话，下一次需要时重新登录
    pub async fn invalidate(&mut self) {
        self.release_driver().await;
        if self.state != SessionState::Closed {
            self.state = SessionState::Unauthenticated;
        }
    }

    /// 关闭会话
    ///
    /// 可重复调用；从未打开过的会话也可以关闭
    pub async fn close(&mut self) {
        self.release_driver().await;
        self.state = SessionState::Closed;
    }

    async fn release_driver(&mut self) {
        if let Some(driver) = self.driver.take() {
            debug!("Releasing browser session");
            if let Err(e) = driver.quit().await {
                warn!("Failed to release browser session: {}", e);
            }
        }
    }
}
