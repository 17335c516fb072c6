// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::{DomainToken, JobPosting, ScrapeRun};
use crate::domain::services::extraction_service::{ExtractionError, ExtractionService};
use crate::engines::traits::{EngineError, PageLoader};
use crate::utils::url_utils::UrlBuilder;
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{error, info, warn};

/// 单个领域的抓取错误
#[derive(Error, Debug)]
pub enum DomainScrapeError {
    #[error(transparent)]
    PageLoad(#[from] EngineError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// 被跳过的领域
#[derive(Debug)]
pub struct DomainFailure {
    pub domain: DomainToken,
    pub url: String,
    pub error: DomainScrapeError,
}

/// 单个领域的抓取结果
#[derive(Debug)]
pub enum DomainOutcome {
    /// 页面加载并完整提取
    Scraped {
        domain: DomainToken,
        url: String,
        postings: Vec<JobPosting>,
    },
    /// 页面加载或提取失败，该领域不贡献任何记录
    Failed(DomainFailure),
}

/// 聚合结果
#[derive(Debug)]
pub struct ScrapeReport {
    /// 带运行日期的全部记录
    pub run: ScrapeRun,
    /// 被跳过的领域，按处理顺序排列
    pub failures: Vec<DomainFailure>,
    /// 尝试处理的领域数
    pub domains_attempted: usize,
}

/// 抓取聚合服务
///
/// 逐个领域构建URL、导航、提取，并把结果按领域顺序追加到同一个集合中。
/// 单个领域的失败只会跳过该领域，循环本身不会中断。
pub struct ScrapeService<L: PageLoader> {
    loader: L,
    extractor: ExtractionService,
    url_builder: UrlBuilder,
}

impl<L: PageLoader> ScrapeService<L> {
    pub fn new(loader: L, extractor: ExtractionService, url_builder: UrlBuilder) -> Self {
        Self {
            loader,
            extractor,
            url_builder,
        }
    }

    /// 抓取单个领域
    pub async fn scrape_domain(&mut self, domain: &DomainToken) -> DomainOutcome {
        let url = self.url_builder.build(domain);
        info!("Scraping domain: {} at URL: {}", domain, url);

        let result = match self.loader.navigate(&url).await {
            Ok(page) => self
                .extractor
                .extract(&page)
                .map_err(DomainScrapeError::from),
            Err(e) => Err(DomainScrapeError::from(e)),
        };

        match result {
            Ok(jobs) => {
                let postings: Vec<JobPosting> = jobs
                    .into_iter()
                    .map(|job| JobPosting::from_extracted(job, domain))
                    .collect();
                info!(domain = %domain, jobs = postings.len(), "Domain scraped");
                DomainOutcome::Scraped {
                    domain: domain.clone(),
                    url,
                    postings,
                }
            }
            Err(error) => DomainOutcome::Failed(DomainFailure {
                domain: domain.clone(),
                url,
                error,
            }),
        }
    }

    /// 按顺序抓取所有领域，并以当前本地日期作为运行日期
    pub async fn run(&mut self, domains: &[DomainToken]) -> ScrapeReport {
        self.run_with_clock(domains, || Local::now().date_naive())
            .await
    }

    /// 按顺序抓取所有领域，循环结束后调用 `clock` 获取运行日期
    pub async fn run_with_clock<C>(&mut self, domains: &[DomainToken], clock: C) -> ScrapeReport
    where
        C: FnOnce() -> NaiveDate,
    {
        let mut records = Vec::new();
        let mut failures = Vec::new();

        for domain in domains {
            match self.scrape_domain(domain).await {
                DomainOutcome::Scraped { postings, .. } => records.extend(postings),
                DomainOutcome::Failed(failure) => {
                    log_failure(&failure);
                    failures.push(failure);
                }
            }
        }

        let run = ScrapeRun::new(clock(), records);
        info!(
            "Total jobs scraped: {} ({} of {} domains failed)",
            run.len(),
            failures.len(),
            domains.len()
        );

        ScrapeReport {
            run,
            failures,
            domains_attempted: domains.len(),
        }
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}

fn log_failure(failure: &DomainFailure) {
    match &failure.error {
        DomainScrapeError::PageLoad(e) if !e.is_page_level() => error!(
            domain = %failure.domain,
            url = %failure.url,
            "Error processing domain {}: {}",
            failure.domain,
            e
        ),
        e => warn!(
            domain = %failure.domain,
            url = %failure.url,
            "Error processing domain {}: {}",
            failure.domain,
            e
        ),
    }
}
