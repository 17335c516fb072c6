// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 就绪标记在超时时间内未出现
    #[error("Page load timed out after {waited:?}: {url}")]
    PageLoadTimeout { url: String, waited: Duration },
    /// 导航失败
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否只影响当前页面
    ///
    /// # 返回值
    ///
    /// 页面级错误返回true，浏览器级错误返回false
    pub fn is_page_level(&self) -> bool {
        matches!(
            self,
            EngineError::PageLoadTimeout { .. } | EngineError::Navigation { .. }
        )
    }
}

/// 渲染完成的页面快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// 请求的URL
    pub url: String,
    /// 渲染后的HTML
    pub html: String,
}

/// 页面加载器特质
///
/// `navigate` 需要 `&mut self`，同一时间只允许一个导航进行
#[async_trait]
pub trait PageLoader: Send {
    /// 导航到指定URL并等待页面就绪
    async fn navigate(&mut self, url: &str) -> Result<RenderedPage, EngineError>;

    /// 释放底层资源，重复调用不产生副作用
    async fn close(&mut self) -> Result<(), EngineError>;

    /// 加载器名称
    fn name(&self) -> &'static str;
}
