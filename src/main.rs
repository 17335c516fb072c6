// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use std::sync::Arc;
use techscene_scraper::application::usecases::run_scrape::RunScrapeUseCase;
use techscene_scraper::config::settings::Settings;
use techscene_scraper::domain::models::job_posting::DomainToken;
use techscene_scraper::domain::services::extraction_service::ExtractionService;
use techscene_scraper::domain::services::scrape_service::ScrapeService;
use techscene_scraper::engines::browser_session::BrowserSession;
use techscene_scraper::infrastructure::database::connection;
use techscene_scraper::infrastructure::repositories::job_posting_repo_impl::JobPostingRepositoryImpl;
use techscene_scraper::utils::telemetry;
use techscene_scraper::utils::url_utils::UrlBuilder;
use tracing::{error, info, warn};

/// 主函数
///
/// 应用程序入口点，完成一次全部领域的抓取与入库
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load .env and configuration
    dotenvy::dotenv().ok();
    let settings = Settings::new().context("Failed to load configuration")?;

    // 2. Initialize logging
    telemetry::init_telemetry(settings.logging.json);
    info!("Starting techscene-scraper...");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database)
        .await
        .context("Failed to connect to database")?;
    let repository = Arc::new(JobPostingRepositoryImpl::new(Arc::new(db)));
    info!("Database connection established");

    // 4. Build extractor before launching the browser so bad selectors fail fast
    let extractor = ExtractionService::new(&settings.scrape.markers)
        .context("Invalid page marker selectors")?;

    // 5. Launch browser
    let session = BrowserSession::launch(&settings.browser, settings.scrape.markers.ready.as_str())
        .await
        .context("Failed to provision browser")?;
    info!("Browser session started");

    // 6. Run
    let domains: Vec<DomainToken> = settings
        .scrape
        .domains
        .iter()
        .map(|d| DomainToken::new(d.as_str()))
        .collect();
    let service = ScrapeService::new(session, extractor, UrlBuilder::new(&settings.scrape.base_url));
    let result = RunScrapeUseCase::new(service, repository.clone())
        .execute(&domains)
        .await;

    if let Ok(repository) = Arc::try_unwrap(repository) {
        if let Err(e) = repository.close().await {
            warn!("Failed to close database connection: {}", e);
        }
    }

    let summary = result.map_err(|e| {
        error!("Persisting scrape run failed, nothing was committed: {}", e);
        e
    })?;

    info!(
        run_date = %summary.run_date,
        domains = summary.domains_attempted,
        failed = summary.failed_domains.len(),
        scraped = summary.records_scraped,
        inserted = summary.rows_inserted,
        "Scrape run finished"
    );

    Ok(())
}
