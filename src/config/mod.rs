// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 加载、校验站点配置，并构建不可变的运行时配置
pub mod settings;
