// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 列表页条目
///
/// 每轮提取产生，匹配后即丢弃，不做持久化。
/// `link` 为绝对地址，也是去重的标识。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub link: String,
    pub author: String,
    pub memo: Option<String>,
}

impl ArticleMeta {
    pub fn new(link: impl Into<String>, author: impl Into<String>, memo: Option<String>) -> Self {
        Self {
            link: link.into(),
            author: author.into(),
            memo,
        }
    }
}
