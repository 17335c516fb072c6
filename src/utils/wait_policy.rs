// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// 等待超时错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("condition not met after {attempts} attempts in {waited:?}")]
pub struct WaitTimeout {
    /// 实际等待时间
    pub waited: Duration,
    /// 探测次数
    pub attempts: u32,
}

/// 轮询等待策略
///
/// 以固定间隔反复执行探测，直到探测返回结果或超过总超时时间。
/// 单次探测同样受剩余时间约束，挂起的探测不会突破超时预算。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// 总超时时间
    pub timeout: Duration,
    /// 轮询间隔
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(250),
        }
    }
}

impl WaitPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// 根据浏览器配置创建等待策略
    pub fn from_settings(settings: &BrowserSettings) -> Self {
        Self::new(
            Duration::from_secs(settings.ready_timeout_secs),
            Duration::from_millis(settings.poll_interval_ms),
        )
    }

    /// 轮询直到探测返回 `Some`
    ///
    /// # 参数
    ///
    /// * `probe` - 探测函数，返回 `None` 表示条件尚未满足
    ///
    /// # 返回值
    ///
    /// * `Ok(T)` - 探测结果
    /// * `Err(WaitTimeout)` - 超时前条件始终未满足
    pub async fn poll_until<F, Fut, T>(&self, mut probe: F) -> Result<T, WaitTimeout>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let interval = self.interval.max(MIN_INTERVAL);
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            match tokio::time::timeout_at(deadline, probe()).await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(_) => {
                    return Err(WaitTimeout {
                        waited: start.elapsed(),
                        attempts,
                    })
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(WaitTimeout {
                    waited: now - start,
                    attempts,
                });
            }

            tokio::time::sleep_until((now + interval).min(deadline)).await;
        }
    }
}
