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

use crate::engines::traits::{EngineError, ListingSource};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// 列表页抓取引擎
///
/// 基于reqwest实现的HTTP GET抓取
pub struct FetchEngine {
    client: reqwest::Client,
}

impl FetchEngine {
    /// 创建抓取引擎
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求的超时时间
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ListingSource for FetchEngine {
    /// 执行HTTP抓取
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 页面内容
    /// * `Err(EngineError)` - 网络错误、超时或非成功状态码
    async fn fetch(&self, url: &str) -> Result<String, EngineError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }

        let content = response.text().await?;
        debug!(
            "Fetched {} ({} bytes) in {}ms",
            url,
            content.len(),
            start.elapsed().as_millis()
        );
        Ok(content)
    }
}
