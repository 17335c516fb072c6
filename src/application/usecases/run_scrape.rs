// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::models::job_posting::DomainToken;
use crate::domain::repositories::job_posting_repository::JobPostingRepository;
use crate::domain::services::scrape_service::{DomainFailure, ScrapeService};
use crate::engines::traits::PageLoader;
use crate::utils::errors::RepositoryError;

// === Section: Use Case Definition ===

/// 一次运行的汇总
#[derive(Debug)]
pub struct RunSummary {
    pub run_date: NaiveDate,
    pub domains_attempted: usize,
    pub failed_domains: Vec<DomainFailure>,
    pub records_scraped: usize,
    pub rows_inserted: u64,
}

/// 抓取运行用例
///
/// 聚合全部领域，关闭浏览器，然后一次性持久化整个运行。
/// 用例按值消费，持久化只会发生一次。
pub struct RunScrapeUseCase<L: PageLoader, R: JobPostingRepository> {
    service: ScrapeService<L>,
    repository: Arc<R>,
}

// === Section: Implementation ===

impl<L: PageLoader, R: JobPostingRepository> RunScrapeUseCase<L, R> {
    pub fn new(service: ScrapeService<L>, repository: Arc<R>) -> Self {
        Self {
            service,
            repository,
        }
    }

    pub async fn execute(mut self, domains: &[DomainToken]) -> Result<RunSummary, RepositoryError> {
        let report = self.service.run(domains).await;

        info!("Closing {} session...", self.service.loader_mut().name());
        if let Err(e) = self.service.loader_mut().close().await {
            warn!("Failed to close page loader: {}", e);
        }

        let rows_inserted = self.repository.save_run(&report.run).await?;

        Ok(RunSummary {
            run_date: report.run.run_date,
            domains_attempted: report.domains_attempted,
            records_scraped: report.run.len(),
            failed_domains: report.failures,
            rows_inserted,
        })
    }
}
