// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义领域标识、职位记录和抓取运行等核心数据结构
pub mod job_posting;
