// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.


use sea_orm::{ConnectionTrait, DatabaseConnection};
use techscene_scraper::config::settings::DatabaseSettings;
use techscene_scraper::infrastructure::database::connection;

pub use static_loader::StaticPageLoader;

/// 创建带 `techscene_jobs` 表的内存数据库
///
/// 内存SQLite每个连接都是独立的库，所以连接池固定为一个连接。
/// `extra_constraint` 会原样追加到建表语句中，用于制造插入失败。
pub async fn setup_db(extra_constraint: Option<&str>) -> DatabaseConnection {
    let settings = DatabaseSettings {
        url: Some("sqlite::memory:".to_string()),
        host: "localhost".to_string(),
        port: 5432,
        name: "postgres".to_string(),
        user: "postgres".to_string(),
        password: String::new(),
        max_connections: Some(1),
        connect_timeout: Some(5),
        sqlx_logging: false,
    };
    let db = connection::create_pool(&settings).await.unwrap();

    let constraint = extra_constraint
        .map(|c| format!(",\n    {}", c))
        .unwrap_or_default();
    let sql = format!(
        "CREATE TABLE techscene_jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_name TEXT NOT NULL,
    job_name TEXT NOT NULL,
    job_link TEXT NOT NULL,
    date_added TEXT NOT NULL,
    domain TEXT NOT NULL{}
)",
        constraint
    );
    db.execute_unprepared(&sql).await.unwrap();

    db
}

/// 生成一张公司卡片的HTML
pub fn company_card(name: &str, jobs: &[(&str, Option<&str>)]) -> String {
    let links: String = jobs
        .iter()
        .map(|(title, href)| match href {
            Some(href) => format!(r#"<a class="homePage-job" href="{}">{}</a>"#, href, title),
            None => format!(r#"<a class="homePage-job">{}</a>"#, title),
        })
        .collect();

    format!(
        r#"<div class="homePage-company">
    <div class="homePage-companyName"> {} </div>
    {}
</div>"#,
        name, links
    )
}

pub fn page_html(cards: &[String]) -> String {
    format!("<html><body><main>{}</main></body></html>", cards.concat())
}
