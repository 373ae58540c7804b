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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status code: {0}")]
    Status(u16),
    /// 超时
    #[error("Timeout: {0}")]
    Timeout(String),
    /// 元素不存在
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
}

impl EngineError {
    /// 判断错误是否由超时引起
    pub fn is_timeout(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => e.is_timeout(),
            EngineError::Timeout(_) => true,
            _ => false,
        }
    }
}

/// 列表页来源特质
///
/// 对列表页执行一次 GET 请求，返回原始页面内容
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, EngineError>;
}

/// 浏览器驱动特质
///
/// 交互式会话依赖的外部浏览器能力：导航、等待、点击、输入。
/// 每个操作都可能以可区分的超时或元素缺失错误失败。
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// 导航到指定URL
    async fn navigate(&self, url: &str) -> Result<(), EngineError>;

    /// 等待选择器对应的元素出现，超过 `timeout` 返回 `EngineError::Timeout`
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), EngineError>;

    async fn click(&self, selector: &str) -> Result<(), EngineError>;

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), EngineError>;

    /// 元素当前是否存在（不等待）
    async fn exists(&self, selector: &str) -> Result<bool, EngineError>;

    /// 释放浏览器资源
    async fn quit(&self) -> Result<(), EngineError>;
}

/// 浏览器驱动工厂
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, EngineError>;

    /// 工厂名称
    fn name(&self) -> &'static str;
}
