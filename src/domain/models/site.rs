// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BOARD_URL: &str = "https://www.clien.net/service/board/park";
pub const DEFAULT_BASE_URL: &str = "https://www.clien.net";
pub const DEFAULT_LOGIN_URL: &str = "https://www.clien.net/service/";

/// 登录凭据
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub id: String,
    pub pw: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("pw", &"***")
            .finish()
    }
}

/// 轮询间隔（秒）
///
/// 每轮休眠时间为 `median` 加上 `[lower_limit, upper_limit]` 内均匀选取的抖动
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingInterval {
    pub median: i64,
    pub lower_limit: i64,
    pub upper_limit: i64,
}

impl Default for PollingInterval {
    fn default() -> Self {
        Self {
            median: 30,
            lower_limit: -10,
            upper_limit: 10,
        }
    }
}

impl PollingInterval {
    /// 计算下一次休眠时长，结果不小于零
    pub fn next_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let jitter = if self.lower_limit < self.upper_limit {
            rng.random_range(self.lower_limit..=self.upper_limit)
        } else {
            self.lower_limit
        };
        let secs = (self.median + jitter).max(0) as u64;
        Duration::from_secs(secs)
    }
}

/// 站点地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEndpoints {
    /// 列表页
    pub board_url: String,
    /// 用于把相对链接解析为绝对地址
    pub base_url: String,
    /// 登录页
    pub login_url: String,
}

impl Default for SiteEndpoints {
    fn default() -> Self {
        Self {
            board_url: DEFAULT_BOARD_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
        }
    }
}

/// 单个站点配置
///
/// 启动时由校验过的配置构建，之后不可变
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// 站点别名（唯一键）
    pub alias: String,
    pub credentials: Credentials,
    /// 被屏蔽的作者标识
    pub blocked_authors: HashSet<String>,
    /// 备注匹配模式，仅在 `memo_rule_enabled` 时参与匹配
    pub memo_pattern: Option<String>,
    pub memo_rule_enabled: bool,
    pub polling: PollingInterval,
    pub endpoints: SiteEndpoints,
}

impl SiteConfig {
    pub fn new(alias: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            alias: alias.into(),
            credentials,
            blocked_authors: HashSet::new(),
            memo_pattern: None,
            memo_rule_enabled: false,
            polling: PollingInterval::default(),
            endpoints: SiteEndpoints::default(),
        }
    }

    pub fn block_author(&mut self, author: impl Into<String>) {
        self.blocked_authors.insert(author.into());
    }
}
