// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：站点配置与列表条目
/// - 仓库接口（repositories）：已访问链接的持久化抽象
/// - 服务（services）：提取、匹配、会话与回复
pub mod models;
pub mod repositories;
pub mod services;
