// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article_meta::ArticleMeta;
use crate::domain::models::site::SiteConfig;

/// 作者是否在站点的屏蔽集合中
pub fn matches_blocked_author(meta: &ArticleMeta, site: &SiteConfig) -> bool {
    site.blocked_authors.contains(&meta.author)
}

/// 备注是否包含站点配置的备注模式
///
/// 未配置模式或条目没有备注时返回false
pub fn matches_memo_pattern(meta: &ArticleMeta, site: &SiteConfig) -> bool {
    match (meta.memo.as_deref(), site.memo_pattern.as_deref()) {
        (Some(memo), Some(pattern)) if !pattern.is_empty() => memo.contains(pattern),
        _ => false,
    }
}

/// 匹配规则集
///
/// 作者规则始终生效；备注规则只有在站点配置 `enable_memo_rule` 时才参与组合
#[derive(Debug, Clone, Copy)]
pub struct MatchRules {
    memo_rule: bool,
}

impl MatchRules {
    pub fn for_site(site: &SiteConfig) -> Self {
        Self {
            memo_rule: site.memo_rule_enabled,
        }
    }

    pub fn memo_rule_enabled(&self) -> bool {
        self.memo_rule
    }

    pub fn matches(&self, meta: &ArticleMeta, site: &SiteConfig) -> bool {
        matches_blocked_author(meta, site) || (self.memo_rule && matches_memo_pattern(meta, site))
    }
}

/// 条目是否命中站点规则
pub fn matches(meta: &ArticleMeta, site: &SiteConfig) -> bool {
    MatchRules::for_site(site).matches(meta, site)
}
