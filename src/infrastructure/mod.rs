// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - 缓存（cache）：基于本地文件的已访问链接缓存
/// - 指标（metrics）：Prometheus 指标导出
pub mod cache;
pub mod metrics;
