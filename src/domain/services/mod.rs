// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction_service）：从列表页HTML提取条目
/// - 匹配服务（matching_service）：按作者与备注规则判断条目是否命中
/// - 会话服务（session_service）：浏览器登录会话的生命周期
/// - 动作服务（action_service）：对命中条目提交回复并记录已访问链接
pub mod action_service;
pub mod extraction_service;
pub mod matching_service;
pub mod session_service;
