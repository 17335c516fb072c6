// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction_service）：从渲染后的页面中解析公司和职位
/// - 抓取服务（scrape_service）：按领域驱动导航与提取，并聚合结果
pub mod extraction_service;
pub mod scrape_service;
