// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::DomainToken;
use url::form_urlencoded;

const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// 领域URL构建器
///
/// 按 `application/x-www-form-urlencoded` 规则编码领域标识：
/// 字母数字、`-`、`_`、`.`、`~` 原样保留，空格转为 `+`，`*` 编码为 `%2A`
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    template: String,
}

impl UrlBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// 为指定领域构建请求URL
    pub fn build(&self, domain: &DomainToken) -> String {
        let encoded = encode_token(domain.as_str());

        if self.template.contains(DOMAIN_PLACEHOLDER) {
            self.template.replace(DOMAIN_PLACEHOLDER, &encoded)
        } else {
            format!("{}{}", self.template, encoded)
        }
    }
}

fn encode_token(token: &str) -> String {
    // `%` itself is always escaped, so `%7E` can only come from `~`
    form_urlencoded::byte_serialize(token.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~")
}
