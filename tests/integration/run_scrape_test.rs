// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{company_card, page_html, setup_db, StaticPageLoader};
use sea_orm::{EntityTrait, QueryOrder};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use techscene_scraper::application::usecases::run_scrape::RunScrapeUseCase;
use techscene_scraper::config::settings::Settings;
use techscene_scraper::domain::models::job_posting::DomainToken;
use techscene_scraper::domain::services::extraction_service::ExtractionService;
use techscene_scraper::domain::services::scrape_service::{DomainScrapeError, ScrapeService};
use techscene_scraper::engines::traits::EngineError;
use techscene_scraper::infrastructure::database::entities::techscene_job;
use techscene_scraper::infrastructure::repositories::job_posting_repo_impl::JobPostingRepositoryImpl;
use techscene_scraper::utils::url_utils::UrlBuilder;

fn front_end_page() -> String {
    page_html(&[
        company_card(
            "Bolt",
            &[
                ("Senior React Developer", Some("/jobs/bolt-react")),
                ("Frontend Engineer", Some("https://bolt.eu/careers/fe")),
                ("UI Engineer", None),
            ],
        ),
        company_card("Wise", &[("Angular Developer", Some("/jobs/wise-ng"))]),
    ])
}

/// 端到端测试：一个领域成功、一个领域超时
///
/// front-end 页面有两家公司（3 + 1 个职位），ai-ml 页面未就绪。
/// 结果应为4条 front-end 记录全部入库，ai-ml 作为失败领域出现在汇总中，
/// 浏览器在入库前关闭一次
#[tokio::test]
async fn test_run_scrapes_persists_and_reports_skipped_domain() {
    let settings = Settings::from_toml("").unwrap();
    let loader = StaticPageLoader::new()
        .with_page("https://techscene.ee/?domain=front-end", front_end_page());
    let visited = loader.visited();
    let closes = loader.closes();

    let db = Arc::new(setup_db(None).await);
    let repo = Arc::new(JobPostingRepositoryImpl::new(db.clone()));
    let service = ScrapeService::new(
        loader,
        ExtractionService::new(&settings.scrape.markers).unwrap(),
        UrlBuilder::new(&settings.scrape.base_url),
    );
    let domains = vec![DomainToken::new("front-end"), DomainToken::new("ai-ml")];

    let summary = RunScrapeUseCase::new(service, repo)
        .execute(&domains)
        .await
        .unwrap();

    assert_eq!(summary.domains_attempted, 2);
    assert_eq!(summary.records_scraped, 4);
    assert_eq!(summary.rows_inserted, 4);
    assert_eq!(summary.failed_domains.len(), 1);
    let failure = &summary.failed_domains[0];
    assert_eq!(failure.domain.as_str(), "ai-ml");
    assert_eq!(failure.url, "https://techscene.ee/?domain=ai-ml");
    assert!(matches!(
        failure.error,
        DomainScrapeError::PageLoad(EngineError::PageLoadTimeout { .. })
    ));

    assert_eq!(
        *visited.lock().unwrap(),
        vec![
            "https://techscene.ee/?domain=front-end".to_string(),
            "https://techscene.ee/?domain=ai-ml".to_string(),
        ]
    );
    assert_eq!(closes.load(Ordering::SeqCst), 1);

    let rows = techscene_job::Entity::find()
        .order_by_asc(techscene_job::Column::Id)
        .all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.domain == "front-end"));
    assert!(rows.iter().all(|row| row.date_added == summary.run_date));

    let companies: Vec<&str> = rows.iter().map(|row| row.company_name.as_str()).collect();
    assert_eq!(companies, vec!["Bolt", "Bolt", "Bolt", "Wise"]);
    assert_eq!(rows[0].job_name, "Senior React Developer");
    assert_eq!(rows[1].job_link, "https://bolt.eu/careers/fe");
    assert_eq!(rows[2].job_link, "");
    assert_eq!(rows[3].job_link, "/jobs/wise-ng");
}

/// 测试所有领域都失败时仍然提交一个空运行
#[tokio::test]
async fn test_run_with_every_domain_failing_commits_nothing() {
    let settings = Settings::from_toml("").unwrap();
    let loader = StaticPageLoader::new();
    let closes = loader.closes();

    let db = Arc::new(setup_db(None).await);
    let repo = Arc::new(JobPostingRepositoryImpl::new(db.clone()));
    let service = ScrapeService::new(
        loader,
        ExtractionService::new(&settings.scrape.markers).unwrap(),
        UrlBuilder::new(&settings.scrape.base_url),
    );
    let domains: Vec<DomainToken> = ["qa", "hr", "other"].into_iter().map(DomainToken::from).collect();

    let summary = RunScrapeUseCase::new(service, repo)
        .execute(&domains)
        .await
        .unwrap();

    assert_eq!(summary.rows_inserted, 0);
    assert_eq!(summary.failed_domains.len(), 3);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert!(techscene_job::Entity::find().all(db.as_ref()).await.unwrap().is_empty());
}

/// 测试页面结构损坏的领域被跳过，不影响后续领域
#[tokio::test]
async fn test_broken_company_card_skips_only_that_domain() {
    let settings = Settings::from_toml("").unwrap();
    let broken = page_html(&[
        company_card("Bolt", &[("Backend Developer", Some("/jobs/1"))]),
        r#"<div class="homePage-company"><a class="homePage-job" href="/jobs/2">Go Developer</a></div>"#
            .to_string(),
    ]);
    let mobile = page_html(&[company_card("Veriff", &[("iOS Developer", Some("/jobs/ios"))])]);
    let loader = StaticPageLoader::new()
        .with_page("https://techscene.ee/?domain=back-end", broken)
        .with_page("https://techscene.ee/?domain=mobile", mobile);

    let db = Arc::new(setup_db(None).await);
    let repo = Arc::new(JobPostingRepositoryImpl::new(db.clone()));
    let service = ScrapeService::new(
        loader,
        ExtractionService::new(&settings.scrape.markers).unwrap(),
        UrlBuilder::new(&settings.scrape.base_url),
    );
    let domains = vec![DomainToken::new("back-end"), DomainToken::new("mobile")];

    let summary = RunScrapeUseCase::new(service, repo)
        .execute(&domains)
        .await
        .unwrap();

    assert_eq!(summary.rows_inserted, 1);
    assert_eq!(summary.failed_domains[0].domain.as_str(), "back-end");
    assert!(matches!(
        summary.failed_domains[0].error,
        DomainScrapeError::Extraction(_)
    ));

    let rows = techscene_job::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_name, "Veriff");
    assert_eq!(rows[0].domain, "mobile");
}
