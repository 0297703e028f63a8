//! Wire types for the Naver news search API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use radar_core::Article;

use crate::html::strip_html;

/// Naver news search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaverSearchResponse {
    /// Time the result was generated (RFC 2822)
    #[serde(rename = "lastBuildDate", default)]
    pub last_build_date: String,
    /// Total number of matching articles
    #[serde(default)]
    pub total: u64,
    /// Offset of the first returned item
    #[serde(default)]
    pub start: u32,
    /// Number of returned items
    #[serde(default)]
    pub display: u32,
    /// Search results
    #[serde(default)]
    pub items: Vec<NaverNewsItem>,
}

/// A single Naver news search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaverNewsItem {
    /// Title with `<b>` highlight markup
    pub title: String,
    /// Publisher URL
    #[serde(rename = "originallink", default)]
    pub original_link: String,
    /// Naver News URL
    #[serde(default)]
    pub link: String,
    /// Snippet with `<b>` highlight markup
    #[serde(default)]
    pub description: String,
    /// Publication date (RFC 2822)
    #[serde(rename = "pubDate", default)]
    pub pub_date: String,
}

/// Naver API error body
#[derive(Debug, Clone, Deserialize)]
pub struct NaverErrorBody {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
    #[serde(rename = "errorCode")]
    pub error_code: String,
}

impl NaverNewsItem {
    /// Remove highlight markup from title and description in place
    pub fn strip_markup(&mut self) {
        self.title = strip_html(&self.title);
        self.description = strip_html(&self.description);
    }

    /// Parsed publication timestamp
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(&self.pub_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert to an article, preferring the publisher link as the natural key
    ///
    /// Fields are moved as-is; call [`strip_markup`](Self::strip_markup) first on raw items.
    pub fn into_article(self) -> Article {
        let published_at = self.published_at();
        let link = if self.original_link.is_empty() {
            self.link
        } else {
            self.original_link
        };

        Article {
            title: self.title,
            description: self.description,
            link,
            published_at,
        }
    }
}
