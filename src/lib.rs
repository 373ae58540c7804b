// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 读取、校验并构建站点配置
pub mod config;

/// 领域模块
///
/// 包含条目模型、匹配规则、会话与回复服务
pub mod domain;

/// 引擎模块
///
/// 列表页抓取与浏览器驱动
pub mod engines;

/// 基础设施模块
///
/// 已访问链接缓存与指标导出
pub mod infrastructure;

/// 工具模块
///
/// 错误类型与日志初始化
pub mod utils;

/// 工作器模块
///
/// 每个站点的轮询循环及其管理
pub mod workers;
