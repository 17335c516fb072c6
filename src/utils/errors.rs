// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库连接失败: {0}")]
    Connection(String),

    #[error("第 {row} 行插入失败: {message}")]
    Insert { row: usize, message: String },

    #[error("数据库错误: {0}")]
    Database(String),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(e) => RepositoryError::Connection(e.to_string()),
            other => RepositoryError::Database(other.to_string()),
        }
    }
}
