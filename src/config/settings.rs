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

use crate::domain::models::site::{Credentials, PollingInterval, SiteConfig, SiteEndpoints};
use crate::utils::errors::SettingsError;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "./main_config.yaml";
pub const DEFAULT_CACHE_PATH: &str = "./visited_link_cache_entries.json";
pub const DEFAULT_REPLY_TEXT: &str = "   ";

/// 原始配置
///
/// 所有站点字段都是可选的，缺失字段由 [`check`] 报告，而不是在反序列化时失败
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    #[serde(default)]
    pub web_site: Option<Vec<RawWebSite>>,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub reply: ReplySettings,
    #[serde(default)]
    pub selectors: SurfaceSelectors,
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// 原始站点配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWebSite {
    pub alias: Option<String>,
    pub user: Option<RawUser>,
    pub blocked_author_name: Option<Vec<String>>,
    pub blocked_author_memo_pattern: Option<String>,
    pub enable_memo_rule: Option<bool>,
    pub polling_interval: Option<RawPollingInterval>,
    pub board_url: Option<String>,
    pub base_url: Option<String>,
    pub login_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    pub id: Option<String>,
    pub pw: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPollingInterval {
    pub median: Option<i64>,
    pub lower_limit: Option<i64>,
    pub upper_limit: Option<i64>,
}

impl RawPollingInterval {
    fn resolve(&self) -> PollingInterval {
        let defaults = PollingInterval::default();
        PollingInterval {
            median: self.median.unwrap_or(defaults.median),
            lower_limit: self.lower_limit.unwrap_or(defaults.lower_limit),
            upper_limit: self.upper_limit.unwrap_or(defaults.upper_limit),
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// 已访问链接的持久化文件
    pub path: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: DEFAULT_CACHE_PATH.to_string(),
        }
    }
}

/// 时间参数配置（秒）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub fetch_timeout: u64,
    pub login_wait: u64,
    pub login_modal_wait: u64,
    pub modal_close_wait: u64,
    pub action_wait: u64,
    pub editor_settle: u64,
    pub input_pause: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: 30,
            login_wait: 20,
            login_modal_wait: 4,
            modal_close_wait: 4,
            action_wait: 16,
            editor_settle: 12,
            input_pause: 1,
        }
    }
}

impl TimingSettings {
    pub fn timings(&self) -> Timings {
        Timings {
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            login_wait: Duration::from_secs(self.login_wait),
            login_modal_wait: Duration::from_secs(self.login_modal_wait),
            modal_close_wait: Duration::from_secs(self.modal_close_wait),
            action_wait: Duration::from_secs(self.action_wait),
            editor_settle: Duration::from_secs(self.editor_settle),
            input_pause: Duration::from_secs(self.input_pause),
        }
    }
}

/// 运行时使用的时间参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// 列表页请求超时
    pub fetch_timeout: Duration,
    /// 等待登录表单出现的上限
    pub login_wait: Duration,
    /// 提交登录后等待设备注册弹窗
    pub login_modal_wait: Duration,
    /// 关闭弹窗后的停顿
    pub modal_close_wait: Duration,
    /// 等待回复输入框出现的上限
    pub action_wait: Duration,
    /// 打开回复编辑器后的稳定等待
    pub editor_settle: Duration,
    /// 输入与提交之间的停顿
    pub input_pause: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        TimingSettings::default().timings()
    }
}

impl Timings {
    /// 所有停顿为零，等待上限保持很短，用于测试
    pub fn immediate() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            login_wait: Duration::from_millis(50),
            login_modal_wait: Duration::ZERO,
            modal_close_wait: Duration::ZERO,
            action_wait: Duration::from_millis(50),
            editor_settle: Duration::ZERO,
            input_pause: Duration::ZERO,
        }
    }
}

/// 回复配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplySettings {
    pub text: String,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            text: DEFAULT_REPLY_TEXT.to_string(),
        }
    }
}

/// 登录与回复界面的CSS选择器
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SurfaceSelectors {
    pub login_form: String,
    pub user_id_input: String,
    pub password_input: String,
    pub login_submit: String,
    /// 可选的“不注册此设备”确认按钮
    pub device_confirm: String,
    pub comment_textarea: String,
    pub comment_open: String,
    pub comment_submit: String,
}

impl Default for SurfaceSelectors {
    fn default() -> Self {
        Self {
            login_form: "#loginForm".to_string(),
            user_id_input: "[name='userId']".to_string(),
            password_input: "[name='userPassword']".to_string(),
            login_submit: "[name='로그인하기']".to_string(),
            device_confirm: ".modal_button_confirm".to_string(),
            comment_textarea: "#editCommentTextarea".to_string(),
            comment_open: ".comment-open".to_string(),
            comment_submit: "#rewrite_height".to_string(),
        }
    }
}

/// 指标配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Prometheus 导出地址，未设置时不启动导出
    pub listen: Option<String>,
}

/// 应用程序配置设置
///
/// 由 [`RawSettings`] 校验并构建，构建后不可变
#[derive(Debug, Clone)]
pub struct Settings {
    /// 按别名索引的站点配置
    pub sites: BTreeMap<String, SiteConfig>,
    pub cache: CacheSettings,
    pub timings: Timings,
    pub reply: ReplySettings,
    pub selectors: SurfaceSelectors,
    pub metrics: MetricsSettings,
}

impl RawSettings {
    /// 从YAML字符串解析原始配置
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// 从配置文件加载原始配置
    ///
    /// 文件格式由扩展名推断，环境变量 `BBS_POLLER__*` 覆盖文件中的值
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let raw = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("BBS_POLLER").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(raw)
    }
}

impl Settings {
    /// 加载、校验并构建配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 校验通过的配置
    /// * `Err(SettingsError)` - 文件无法读取或校验失败
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        Self::from_raw(RawSettings::load(path)?)
    }

    pub fn from_raw(raw: RawSettings) -> Result<Self, SettingsError> {
        check(&raw)?;
        Ok(Self {
            sites: build(&raw),
            timings: raw.timing.timings(),
            cache: raw.cache,
            reply: raw.reply,
            selectors: raw.selectors,
            metrics: raw.metrics,
        })
    }
}

/// 配置是否有效
pub fn validate(raw: &RawSettings) -> bool {
    check(raw).is_ok()
}

fn invalid(message: impl Into<String>) -> SettingsError {
    SettingsError::Invalid(message.into())
}

fn non_empty<'a>(value: Option<&'a str>, field: &str, alias: &str) -> Result<&'a str, SettingsError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| invalid(format!("site `{}`: `{}` is missing or empty", alias, field)))
}

/// 校验原始配置，返回第一个违规项
pub fn check(raw: &RawSettings) -> Result<(), SettingsError> {
    let sites = match &raw.web_site {
        Some(sites) if !sites.is_empty() => sites,
        _ => return Err(invalid("`web_site` must declare at least one site")),
    };

    let mut aliases = HashSet::new();
    for (index, site) in sites.iter().enumerate() {
        let alias = site
            .alias
            .as_deref()
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .ok_or_else(|| invalid(format!("web_site[{}]: `alias` is missing or empty", index)))?;
        if !aliases.insert(alias) {
            return Err(invalid(format!("duplicate site alias `{}`", alias)));
        }

        let user = site
            .user
            .as_ref()
            .ok_or_else(|| invalid(format!("site `{}`: `user` is missing", alias)))?;
        non_empty(user.id.as_deref(), "user.id", alias)?;
        non_empty(user.pw.as_deref(), "user.pw", alias)?;
        non_empty(
            site.blocked_author_memo_pattern.as_deref(),
            "blocked_author_memo_pattern",
            alias,
        )?;

        if let Some(polling) = &site.polling_interval {
            let polling = polling.resolve();
            if polling.lower_limit > polling.upper_limit {
                return Err(invalid(format!(
                    "site `{}`: polling_interval.lower_limit ({}) exceeds upper_limit ({})",
                    alias, polling.lower_limit, polling.upper_limit
                )));
            }
            if polling.median + polling.lower_limit < 0 {
                return Err(invalid(format!(
                    "site `{}`: polling_interval.median + lower_limit must not be negative",
                    alias
                )));
            }
        }

        for (field, value) in [
            ("board_url", &site.board_url),
            ("base_url", &site.base_url),
            ("login_url", &site.login_url),
        ] {
            if let Some(value) = value {
                Url::parse(value).map_err(|e| {
                    invalid(format!("site `{}`: `{}` is not a valid URL: {}", alias, field, e))
                })?;
            }
        }
    }

    Ok(())
}

/// 把原始配置转换为按别名索引的站点配置
///
/// 假定 [`check`] 已经通过；屏蔽作者列表按集合语义去重
pub fn build(raw: &RawSettings) -> BTreeMap<String, SiteConfig> {
    let mut sites = BTreeMap::new();

    for site in raw.web_site.iter().flatten() {
        let alias = site.alias.as_deref().unwrap_or_default().trim().to_string();
        let user = site.user.clone().unwrap_or_default();
        let credentials = Credentials {
            id: user.id.unwrap_or_default(),
            pw: user.pw.unwrap_or_default(),
        };

        let defaults = SiteEndpoints::default();
        let mut config = SiteConfig::new(alias.clone(), credentials);
        for author in site.blocked_author_name.iter().flatten() {
            config.block_author(author.clone());
        }
        config.memo_pattern = site.blocked_author_memo_pattern.clone();
        config.memo_rule_enabled = site.enable_memo_rule.unwrap_or(false);
        config.polling = site
            .polling_interval
            .as_ref()
            .map(RawPollingInterval::resolve)
            .unwrap_or_default();
        config.endpoints = SiteEndpoints {
            board_url: site.board_url.clone().unwrap_or(defaults.board_url),
            base_url: site.base_url.clone().unwrap_or(defaults.base_url),
            login_url: site.login_url.clone().unwrap_or(defaults.login_url),
        };

        sites.insert(alias, config);
    }

    sites
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
