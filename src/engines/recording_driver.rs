// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{BrowserDriver, DriverFactory, EngineError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// 驱动收到的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Navigate(String),
    WaitFor(String),
    Click(String),
    Type(String, String),
    Exists(String),
    Quit,
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<DriverCall>>,
    missing: Mutex<HashSet<String>>,
    launch_failures: AtomicUsize,
    launches: AtomicUsize,
    quits: AtomicUsize,
}

impl Recorder {
    fn calls(&self) -> MutexGuard<'_, Vec<DriverCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn missing(&self) -> MutexGuard<'_, HashSet<String>> {
        self.missing.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: DriverCall) {
        self.calls().push(call);
    }

    fn is_missing(&self, selector: &str) -> bool {
        self.missing().contains(selector)
    }
}

/// 记录型驱动工厂
///
/// 不启动真实浏览器，只记录会话对驱动的调用顺序，用于测试登录与回复流程。
/// 可以把某些选择器标记为缺失，模拟等待超时和元素不存在。
#[derive(Clone, Default)]
pub struct RecordingDriverFactory {
    recorder: Arc<Recorder>,
}

impl RecordingDriverFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记选择器为缺失：等待超时，点击和输入返回元素不存在，`exists` 返回 false
    pub fn with_missing(self, selector: &str) -> Self {
        self.set_missing(selector);
        self
    }

    pub fn set_missing(&self, selector: &str) {
        self.recorder.missing().insert(selector.to_string());
    }

    pub fn clear_missing(&self, selector: &str) {
        self.recorder.missing().remove(selector);
    }

    /// 接下来的 `count` 次启动返回浏览器错误
    pub fn fail_launches(&self, count: usize) {
        self.recorder.launch_failures.store(count, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.recorder.calls().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.recorder
            .calls()
            .iter()
            .filter_map(|call| match call {
                DriverCall::Navigate(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// 输入到指定选择器的全部文本
    pub fn typed_into(&self, selector: &str) -> Vec<String> {
        self.recorder
            .calls()
            .iter()
            .filter_map(|call| match call {
                DriverCall::Type(target, text) if target == selector => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clicks(&self, selector: &str) -> usize {
        self.recorder
            .calls()
            .iter()
            .filter(|call| matches!(call, DriverCall::Click(target) if target == selector))
            .count()
    }

    pub fn launches(&self) -> usize {
        self.recorder.launches.load(Ordering::SeqCst)
    }

    pub fn quits(&self) -> usize {
        self.recorder.quits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DriverFactory for RecordingDriverFactory {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, EngineError> {
        let pending = self.recorder.launch_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.recorder
                .launch_failures
                .store(pending - 1, Ordering::SeqCst);
            return Err(EngineError::Browser("launch refused".to_string()));
        }

        self.recorder.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingDriver {
            recorder: self.recorder.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// 记录型驱动
pub struct RecordingDriver {
    recorder: Arc<Recorder>,
}

impl RecordingDriver {
    fn require(&self, selector: &str) -> Result<(), EngineError> {
        if self.recorder.is_missing(selector) {
            Err(EngineError::ElementNotFound(selector.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BrowserDriver for RecordingDriver {
    async fn navigate(&self, url: &str) -> Result<(), EngineError> {
        self.recorder.record(DriverCall::Navigate(url.to_string()));
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), EngineError> {
        self.recorder
            .record(DriverCall::WaitFor(selector.to_string()));
        if self.recorder.is_missing(selector) {
            tokio::time::sleep(timeout).await;
            return Err(EngineError::Timeout(selector.to_string()));
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), EngineError> {
        self.require(selector)?;
        self.recorder.record(DriverCall::Click(selector.to_string()));
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), EngineError> {
        self.require(selector)?;
        self.recorder
            .record(DriverCall::Type(selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool, EngineError> {
        self.recorder.record(DriverCall::Exists(selector.to_string()));
        Ok(!self.recorder.is_missing(selector))
    }

    async fn quit(&self) -> Result<(), EngineError> {
        self.recorder.record(DriverCall::Quit);
        self.recorder.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
