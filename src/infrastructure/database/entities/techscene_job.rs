// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

/// `techscene_jobs` 表，只追加不更新
///
/// `id` 仅供ORM识别主键，写入时不赋值
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "techscene_jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_name: String,
    pub job_name: String,
    pub job_link: String,
    pub date_added: Date,
    pub domain: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
