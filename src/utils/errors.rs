// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::EngineError;
use thiserror::Error;

/// 配置错误类型
///
/// 启动阶段的致命错误，任何一项校验失败都不允许以部分配置运行
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// 已访问链接缓存错误类型
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// 会话错误类型
///
/// 登录或回复过程中的超时、元素缺失等错误。
/// 这些错误只会放弃当前轮次，不会终止进程。
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Session is not authenticated")]
    NotAuthenticated,

    #[error("Session has been closed")]
    Closed,

    #[error("Browser driver error: {0}")]
    Driver(EngineError),
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Timeout(what) => SessionError::Timeout(what),
            EngineError::ElementNotFound(selector) => SessionError::ElementNotFound(selector),
            other => SessionError::Driver(other),
        }
    }
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] EngineError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}
