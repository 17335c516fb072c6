// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括错误类型、日志初始化、URL构建和轮询等待
pub mod errors;
pub mod telemetry;
pub mod url_utils;
pub mod wait_policy;
