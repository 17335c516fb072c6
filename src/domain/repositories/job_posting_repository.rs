// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::ScrapeRun;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 职位记录仓库特质
///
/// 定义抓取结果的持久化接口
#[async_trait]
pub trait JobPostingRepository: Send + Sync {
    /// 在单个事务中写入整个运行的所有记录
    ///
    /// 全部插入成功后提交并返回写入行数；任意一行失败则整体回滚
    async fn save_run(&self, run: &ScrapeRun) -> Result<u64, RepositoryError>;
}
