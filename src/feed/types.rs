//! Wire types returned by the news backend.
//!
//! Field names follow the backend's JSON (`snake_case`). Everything here is
//! read-only from the client's point of view: layout code borrows articles,
//! it never rewrites them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of articles requested per page.
pub const PAGE_SIZE: u32 = 20;

/// Publisher of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
}

impl Source {
    /// First letter of the source name, used as a thumbnail placeholder.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .find(|c| c.is_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

/// One entry of a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Unique within a page. Empty when the backend has no detail page for
    /// the item, in which case the external `url` is the only link.
    #[serde(default)]
    pub slug: String,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published_date: DateTime<Utc>,
    pub source: Source,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Where activating an article leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleLink {
    /// In-app location of the detail view (`/article/{slug}`).
    Internal(String),
    /// Source website, opened in the system browser.
    External(String),
}

impl Article {
    pub fn link(&self) -> ArticleLink {
        if self.slug.trim().is_empty() {
            ArticleLink::External(self.url.clone())
        } else {
            ArticleLink::Internal(format!("/article/{}", self.slug))
        }
    }
}

/// One page of the listing plus the total across all pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub items: Vec<Article>,
    #[serde(rename = "count", default)]
    pub total_count: u64,
}

impl FeedPage {
    /// The page every failed fetch degrades to.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Full article as served by `/api/articles/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// HTML body; may be empty when only a preview was ingested.
    #[serde(default)]
    pub content: String,
    pub published_date: DateTime<Utc>,
    pub source: Source,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Build a listing article with a predictable slug and timestamp.
    pub fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            url: format!("https://example.com/{}", title.to_lowercase()),
            image_url: None,
            published_date: Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap(),
            source: Source {
                name: "Wire".to_string(),
            },
            category: None,
            summary: None,
        }
    }

    pub fn page(titles: &[&str], total_count: u64) -> FeedPage {
        FeedPage {
            items: titles.iter().map(|t| article(t)).collect(),
            total_count,
        }
    }
}
