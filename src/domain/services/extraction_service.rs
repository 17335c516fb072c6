// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MarkerSettings;
use crate::domain::models::job_posting::ExtractedJob;
use crate::engines::traits::RenderedPage;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// 提取错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// 选择器语法错误
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    /// 公司卡片中缺少公司名称标记
    #[error("Company card #{card_index} has no company name marker")]
    MissingCompanyName { card_index: usize },
}

/// 职位提取服务
///
/// 从渲染后的页面中提取 公司 -> 职位 两级结构。
/// 纯解析，不发起网络请求也不等待。
#[derive(Debug, Clone)]
pub struct ExtractionService {
    company_card: Selector,
    company_name: Selector,
    job: Selector,
}

impl ExtractionService {
    /// 根据页面标记配置创建提取服务
    pub fn new(markers: &MarkerSettings) -> Result<Self, ExtractionError> {
        Ok(Self {
            company_card: parse_selector(&markers.company_card)?,
            company_name: parse_selector(&markers.company_name)?,
            job: parse_selector(&markers.job)?,
        })
    }

    /// 提取页面中的所有职位
    ///
    /// # 参数
    ///
    /// * `page` - 渲染完成的页面
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<ExtractedJob>)` - 按文档顺序排列的职位
    /// * `Err(ExtractionError)` - 公司卡片结构不完整
    pub fn extract(&self, page: &RenderedPage) -> Result<Vec<ExtractedJob>, ExtractionError> {
        let document = Html::parse_document(&page.html);
        let mut jobs = Vec::new();

        for (card_index, card) in document.select(&self.company_card).enumerate() {
            let company_name = card
                .select(&self.company_name)
                .next()
                .map(|element| element_text(&element))
                .ok_or(ExtractionError::MissingCompanyName { card_index })?;

            for job in card.select(&self.job) {
                jobs.push(ExtractedJob {
                    company_name: company_name.clone(),
                    job_title: element_text(&job),
                    job_href: job.value().attr("href").unwrap_or_default().to_string(),
                });
            }
        }

        Ok(jobs)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
