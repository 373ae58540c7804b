// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article_meta::ArticleMeta;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

const AUTHOR_BLOCK: &str = "div.list_author";
const AUTHOR_TITLE: &str = "span[title]";
const MEMO: &str = "span.memo";
const TITLE_LINK: &str = "div.list_title a[href]";

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector {}: {:?}", selector, e))
}

/// 提取服务
///
/// 从列表页HTML中提取条目：作者块里带 `title` 属性的 span 给出作者标识，
/// 相邻的备注 span 给出可选备注，同一条目中的标题块给出文章链接。
/// 缺少作者或链接的条目会被跳过，不影响同一批次的其他条目。
pub struct ExtractionService {
    base_url: Url,
    author_block: Selector,
    author_title: Selector,
    memo: Selector,
    title_link: Selector,
}

impl ExtractionService {
    /// 创建提取服务
    ///
    /// # 参数
    ///
    /// * `base_url` - 用于把相对链接解析为绝对地址的站点根地址
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            author_block: parse_selector(AUTHOR_BLOCK)?,
            author_title: parse_selector(AUTHOR_TITLE)?,
            memo: parse_selector(MEMO)?,
            title_link: parse_selector(TITLE_LINK)?,
        })
    }

    /// 提取条目，按文档顺序返回
    pub fn extract(&self, html_content: &str) -> Vec<ArticleMeta> {
        let document = Html::parse_document(html_content);

        let mut entries = Vec::new();
        for author_block in document.select(&self.author_block) {
            match self.extract_entry(author_block) {
                Some(entry) => entries.push(entry),
                None => debug!("Skipping malformed listing entry"),
            }
        }
        entries
    }

    fn extract_entry(&self, author_block: ElementRef<'_>) -> Option<ArticleMeta> {
        let author = author_block
            .select(&self.author_title)
            .next()?
            .value()
            .attr("title")?
            .trim();
        if author.is_empty() {
            return None;
        }

        let memo = author_block
            .select(&self.memo)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|memo| !memo.is_empty());

        let href = self.find_href(author_block)?;
        let link = self.base_url.join(href.trim()).ok()?;

        Some(ArticleMeta::new(link.to_string(), author, memo))
    }

    // The title block is normally a sibling inside the entry container.
    fn find_href<'a>(&self, author_block: ElementRef<'a>) -> Option<&'a str> {
        let in_block = author_block.select(&self.title_link).next();
        let anchor = match in_block {
            Some(anchor) => anchor,
            None => author_block
                .parent()
                .and_then(ElementRef::wrap)?
                .select(&self.title_link)
                .next()?,
        };

        anchor.value().attr("href").filter(|href| !href.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
