// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{EngineError, PageLoader, RenderedPage};
use crate::utils::wait_policy::WaitPolicy;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::io;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 发送关闭命令后等待浏览器进程退出的最长时间
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// 本地浏览器子进程
///
/// 关闭命令经由事件处理任务发送，处理任务停止后命令无法送达，
/// 此时只能直接结束进程
#[async_trait]
trait BrowserProcess: Send {
    /// 等待进程退出
    async fn wait_exit(&mut self) -> io::Result<()>;

    /// 强制结束进程
    async fn terminate(&mut self) -> io::Result<()>;
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn wait_exit(&mut self) -> io::Result<()> {
        self.wait().await.map(|_| ())
    }

    async fn terminate(&mut self) -> io::Result<()> {
        self.kill().await.unwrap_or(Ok(()))
    }
}

/// 回收浏览器进程
///
/// 关闭命令未送达时先结束进程；等待超过 `grace` 仍未退出同样结束进程
async fn reap<P: BrowserProcess>(process: &mut P, close_sent: bool, grace: Duration) {
    if !close_sent {
        warn!("Close command was not delivered, killing browser process");
        if let Err(e) = process.terminate().await {
            warn!("Failed to kill browser process: {}", e);
        }
    }

    match tokio::time::timeout(grace, process.wait_exit()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to wait for browser process exit: {}", e),
        Err(_) => {
            warn!("Browser process still running after {:?}, killing it", grace);
            if let Err(e) = process.terminate().await {
                warn!("Failed to kill browser process: {}", e);
            }
        }
    }
}

/// 浏览器会话
///
/// 整个运行期间只持有一个无头浏览器和一个标签页。
/// `close` 只会真正执行一次；未关闭就被丢弃时，
/// 事件处理任务会被中止，本地启动的浏览器进程由 `Browser` 自身负责结束。
pub struct BrowserSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
    ready_selector: String,
    wait: WaitPolicy,
    remote: bool,
}

impl BrowserSession {
    /// 启动或连接浏览器并打开工作标签页
    ///
    /// # 参数
    ///
    /// * `settings` - 浏览器配置
    /// * `ready_selector` - 页面就绪标记的CSS选择器
    ///
    /// # 返回值
    ///
    /// * `Ok(BrowserSession)` - 可用的浏览器会话
    /// * `Err(EngineError::Launch)` - 浏览器启动、连接或建立标签页失败
    pub async fn launch(
        settings: &BrowserSettings,
        ready_selector: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let remote = settings.remote_debugging_url.is_some();

        let (browser, mut handler) = if let Some(url) = &settings.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str())
                .await
                .map_err(|e| EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            Browser::launch(Self::browser_config(settings)?)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event handler stopped: {}", e);
                    break;
                }
            }
        });

        let mut session = Self {
            browser: Some(browser),
            page: None,
            handler_task: Some(handler_task),
            ready_selector: ready_selector.into(),
            wait: WaitPolicy::from_settings(settings),
            remote,
        };

        match session.open_tab().await {
            Ok(page) => {
                session.page = Some(page);
                info!(remote, "Browser session ready");
                Ok(session)
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!("Failed to close browser after tab creation error: {}", close_err);
                }
                Err(e)
            }
        }
    }

    /// 构建本地浏览器启动配置
    ///
    /// 无头模式，关闭沙箱、GPU 和 /dev/shm 共享内存，适合无人值守运行
    pub fn browser_config(settings: &BrowserSettings) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(settings.request_timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if let Some(executable) = &settings.executable {
            builder = builder.chrome_executable(executable);
        }

        for arg in &settings.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder.build().map_err(EngineError::Launch)
    }

    async fn open_tab(&self) -> Result<Page, EngineError> {
        let browser = self.browser.as_ref().ok_or_else(Self::closed_error)?;
        browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Launch(format!("Failed to open browser tab: {}", e)))
    }

    fn closed_error() -> EngineError {
        EngineError::Other("browser session is closed".to_string())
    }
}

#[async_trait]
impl PageLoader for BrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<RenderedPage, EngineError> {
        let page = self.page.as_ref().ok_or_else(Self::closed_error)?;
        let start = Instant::now();

        page.goto(url).await.map_err(|e| EngineError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let selector = self.ready_selector.as_str();
        let markers = self
            .wait
            .poll_until(move || async move {
                match page.find_elements(selector).await {
                    Ok(elements) if !elements.is_empty() => Some(elements.len()),
                    _ => None,
                }
            })
            .await
            .map_err(|timeout| EngineError::PageLoadTimeout {
                url: url.to_string(),
                waited: timeout.waited,
            })?;

        let html = page.content().await.map_err(|e| EngineError::Navigation {
            url: url.to_string(),
            message: format!("Failed to read page content: {}", e),
        })?;

        debug!(
            url,
            markers,
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Page ready"
        );

        Ok(RenderedPage {
            url: url.to_string(),
            html,
        })
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        info!("Closing browser session...");

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close tab: {}", e);
            }
        }

        // A remote browser is shared; only the tab belongs to this session
        let result = if self.remote {
            Ok(())
        } else {
            let closed = browser
                .close()
                .await
                .map(|_| ())
                .map_err(|e| EngineError::Other(format!("Failed to close browser: {}", e)));
            reap(&mut browser, closed.is_ok(), EXIT_GRACE).await;
            closed
        };

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        result
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.browser.is_some() {
            warn!("Browser session dropped without close");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}
