// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// 默认抓取的领域列表，顺序即抓取顺序
pub const DEFAULT_DOMAINS: &[&str] = &[
    "front-end",
    "back-end",
    "full-stack",
    "mobile",
    "software-development",
    "devops-sre",
    "data-science",
    "cyber-security",
    "ai-ml",
    "qa",
    "analytics",
    "sales",
    "finance",
    "marketing",
    "design",
    "hr",
    "customer-support",
    "management",
    "other",
];

/// 应用程序配置设置
///
/// 包含数据库、浏览器、抓取目标和日志等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 抓取目标配置
    pub scrape: ScrapeSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 完整连接URL，设置后优先于分项配置
    pub url: Option<String>,
    /// 数据库主机
    pub host: String,
    /// 数据库端口
    pub port: u16,
    /// 数据库名称
    pub name: String,
    /// 用户名
    pub user: String,
    /// 密码
    pub password: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 是否记录SQL语句
    pub sqlx_logging: bool,
}

impl DatabaseSettings {
    /// 生成数据库连接URL
    ///
    /// 用户名和密码会进行百分号编码，避免特殊字符破坏URL结构
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.name
        )
    }
}

/// 浏览器配置设置
#[derive(Debug, Deserialize)]
pub struct BrowserSettings {
    /// Chromium 可执行文件路径，未设置时自动探测
    pub executable: Option<PathBuf>,
    /// 远程 DevTools 地址，设置后不再启动本地浏览器
    pub remote_debugging_url: Option<String>,
    /// 等待就绪标记的超时时间（秒）
    pub ready_timeout_secs: u64,
    /// 就绪检测的轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// CDP 请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 额外的启动参数
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// 页面标记选择器
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerSettings {
    /// 公司卡片
    pub company_card: String,
    /// 公司名称（位于卡片内部）
    pub company_name: String,
    /// 职位链接（位于卡片内部）
    pub job: String,
    /// 页面就绪标记
    pub ready: String,
}

/// 抓取目标配置设置
#[derive(Debug, Deserialize)]
pub struct ScrapeSettings {
    /// URL模板，`{domain}` 占位符缺省时直接追加在末尾
    pub base_url: String,
    /// 领域列表
    pub domains: Vec<String>,
    /// 页面标记
    pub markers: MarkerSettings,
}

/// 日志配置设置
#[derive(Debug, Deserialize)]
pub struct LoggingSettings {
    /// 是否输出JSON格式日志
    pub json: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、配置文件、`TECHSCENE__` 前缀环境变量，
    /// 最后由 `DB_*` 环境变量覆盖数据库连接参数
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("TECHSCENE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("scrape.domains"),
            )
            .set_override_option("database.host", std::env::var("DB_HOST").ok())?
            .set_override_option("database.port", std::env::var("DB_PORT").ok())?
            .set_override_option("database.name", std::env::var("DB_NAME").ok())?
            .set_override_option("database.user", std::env::var("DB_USER").ok())?
            .set_override_option("database.password", std::env::var("DB_PASSWORD").ok())?;

        builder.build()?.try_deserialize()
    }

    /// 仅从给定的TOML文本叠加默认值加载配置，不读取环境变量
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let domains: Vec<String> = DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect();

        Config::builder()
            // Database defaults
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.name", "postgres")?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.max_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.sqlx_logging", false)?
            // Browser defaults
            .set_default("browser.ready_timeout_secs", 10)?
            .set_default("browser.poll_interval_ms", 250)?
            .set_default("browser.request_timeout_secs", 30)?
            // Scrape target defaults
            .set_default("scrape.base_url", "https://techscene.ee/?domain=")?
            .set_default("scrape.domains", domains)?
            .set_default("scrape.markers.company_card", ".homePage-company")?
            .set_default("scrape.markers.company_name", ".homePage-companyName")?
            .set_default("scrape.markers.job", ".homePage-job")?
            .set_default("scrape.markers.ready", ".homePage-company")?
            // Logging defaults
            .set_default("logging.json", false)
    }
}
