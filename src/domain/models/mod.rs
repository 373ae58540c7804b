// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 站点配置（site）：凭据、屏蔽规则与轮询参数
/// - 条目（article_meta）：列表页提取出的作者、备注和链接
pub mod article_meta;
pub mod site;
