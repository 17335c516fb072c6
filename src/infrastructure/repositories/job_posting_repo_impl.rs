// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::{JobPosting, ScrapeRun};
use crate::domain::repositories::job_posting_repository::JobPostingRepository;
use crate::infrastructure::database::entities::techscene_job;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::*;
use std::sync::Arc;
use tracing::{info, warn};

/// 职位记录仓库实现
pub struct JobPostingRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobPostingRepositoryImpl {
    /// 创建新的职位记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的职位记录仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 关闭数据库连接
    ///
    /// 连接仍被其他持有者引用时只释放本仓库的引用
    pub async fn close(self) -> Result<(), RepositoryError> {
        match Arc::try_unwrap(self.db) {
            Ok(db) => db.close().await.map_err(RepositoryError::from),
            Err(_) => Ok(()),
        }
    }

    fn to_active_model(posting: &JobPosting, run_date: NaiveDate) -> techscene_job::ActiveModel {
        techscene_job::ActiveModel {
            company_name: Set(posting.company_name.clone()),
            job_name: Set(posting.job_title.clone()),
            job_link: Set(posting.job_link.clone()),
            date_added: Set(run_date),
            domain: Set(posting.domain.as_str().to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl JobPostingRepository for JobPostingRepositoryImpl {
    async fn save_run(&self, run: &ScrapeRun) -> Result<u64, RepositoryError> {
        let txn = self.db.begin().await?;
        let mut inserted = 0u64;

        for (row, posting) in run.records.iter().enumerate() {
            let model = Self::to_active_model(posting, run.run_date);

            match techscene_job::Entity::insert(model)
                .exec_without_returning(&txn)
                .await
            {
                Ok(affected) => inserted += affected,
                Err(e) => {
                    if let Err(rollback_err) = txn.rollback().await {
                        warn!("Rollback after failed insert also failed: {}", rollback_err);
                    }
                    return Err(RepositoryError::Insert {
                        row,
                        message: e.to_string(),
                    });
                }
            }
        }

        txn.commit().await?;
        info!("Successfully inserted {} rows into database", inserted);

        Ok(inserted)
    }
}
