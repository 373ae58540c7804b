// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 每个站点一个轮询工作器，由管理器统一启动和关闭
pub mod manager;
pub mod poll_worker;

pub use manager::WorkerManager;
pub use poll_worker::{CycleReport, PollWorker};
