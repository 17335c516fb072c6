// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use std::fmt;

/// 领域标识
///
/// 目标站点用于划分职位列表的分类过滤值，例如 `front-end`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainToken(String);

impl DomainToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DomainToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 页面中提取出的单个职位，尚未关联领域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedJob {
    /// 公司名称（已去除首尾空白）
    pub company_name: String,
    /// 职位名称（已去除首尾空白）
    pub job_title: String,
    /// 职位链接，缺少 href 时为空字符串
    pub job_href: String,
}

/// 职位记录
///
/// 提取完成后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    pub company_name: String,
    pub job_title: String,
    /// 原样保存的链接，可能是相对路径
    pub job_link: String,
    pub domain: DomainToken,
}

impl JobPosting {
    pub fn from_extracted(job: ExtractedJob, domain: &DomainToken) -> Self {
        Self {
            company_name: job.company_name,
            job_title: job.job_title,
            job_link: job.job_href,
            domain: domain.clone(),
        }
    }
}

/// 一次完整的抓取运行
///
/// 记录按领域顺序、再按页面文档顺序排列，不保证唯一性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRun {
    /// 运行日期
    pub run_date: NaiveDate,
    /// 所有成功领域的职位记录
    pub records: Vec<JobPosting>,
}

impl ScrapeRun {
    pub fn new(run_date: NaiveDate, records: Vec<JobPosting>) -> Self {
        Self { run_date, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
