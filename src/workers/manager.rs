// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::workers::poll_worker::PollWorker;
use futures::future::join_all;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 为每个站点启动一个轮询任务，并通过共享的关闭信号协调退出
pub struct WorkerManager {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl Default for WorkerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// 订阅关闭信号，传给新建的工作器
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 启动工作器
    ///
    /// # 参数
    ///
    /// * `worker` - 站点轮询工作器
    /// * `once` - 只执行一轮后退出
    pub fn spawn(&mut self, worker: PollWorker, once: bool) {
        let alias = worker.alias().to_string();
        info!("Starting poll worker for {}", alias);

        let task_alias = alias.clone();
        let handle = tokio::spawn(async move {
            if once {
                match worker.run_once().await {
                    Ok(report) => info!("[{}] Single cycle done: {:?}", task_alias, report),
                    Err(e) => error!("[{}] Single cycle failed: {}", task_alias, e),
                }
            } else {
                worker.run().await;
            }
        });
        self.handles.push((alias, handle));
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// 通知所有工作器停止
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// 等待所有工作器退出
    pub async fn join(&mut self) {
        let handles = std::mem::take(&mut self.handles);
        Self::report(join_all(handles.into_iter().map(wait_worker)).await);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 所有工作器自行结束（例如单轮模式）时直接返回；
    /// 收到 Ctrl-C 或 SIGTERM 时通知工作器停止，并等待它们释放浏览器会话
    pub async fn wait_for_shutdown(&mut self) {
        let handles = std::mem::take(&mut self.handles);
        let all = join_all(handles.into_iter().map(wait_worker));
        tokio::pin!(all);

        tokio::select! {
            results = &mut all => {
                Self::report(results);
                return;
            }
            _ = shutdown_signal() => info!("Shutdown signal received"),
        }

        info!("Shutting down workers...");
        self.shutdown();
        Self::report(all.await);
        info!("Workers shut down successfully");
    }

    fn report(results: Vec<(String, Result<(), tokio::task::JoinError>)>) {
        for (alias, result) in results {
            if let Err(e) = result {
                error!("Poll worker for {} terminated abnormally: {}", alias, e);
            }
        }
    }
}

async fn wait_worker(
    (alias, handle): (String, JoinHandle<()>),
) -> (String, Result<(), tokio::task::JoinError>) {
    (alias, handle.await)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Unable to listen for shutdown signal: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Unable to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
