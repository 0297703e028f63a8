//! News data structures for keyword harvesting

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RadarError;

/// Upper bound on articles per page accepted by the search provider
pub const MAX_DISPLAY: u32 = 100;

/// Upper bound on the result offset accepted by the search provider
pub const MAX_START: u32 = 1000;

/// A news article returned by the search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Article title, HTML-stripped
    pub title: String,
    /// Article description/snippet, HTML-stripped
    pub description: String,
    /// Original publisher link (natural key for archival)
    pub link: String,
    /// Publication timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Create an article without a publication timestamp
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
            published_at: None,
        }
    }
}

/// Ordering of search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Relevance to the query
    #[default]
    #[serde(rename = "sim")]
    Similarity,
    /// Most recent first
    #[serde(rename = "date")]
    Date,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Similarity => "sim",
            SortOrder::Date => "date",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sim" => Ok(SortOrder::Similarity),
            "date" => Ok(SortOrder::Date),
            other => Err(RadarError::invalid_parameter(format!(
                "sort must be one of 'sim' or 'date', got '{}'",
                other
            ))),
        }
    }
}

/// Parameters for a single news search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSearchParams {
    /// Search query
    pub query: String,
    /// Number of results per page (1-100)
    #[serde(default = "default_display")]
    pub display: u32,
    /// 1-based offset of the first result (1-1000)
    #[serde(default = "default_start")]
    pub start: u32,
    /// Result ordering
    #[serde(default)]
    pub sort: SortOrder,
}

fn default_display() -> u32 {
    10
}

fn default_start() -> u32 {
    1
}

impl NewsSearchParams {
    /// Search for `query` with the provider defaults
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            display: default_display(),
            start: default_start(),
            sort: SortOrder::default(),
        }
    }

    pub fn with_display(mut self, display: u32) -> Self {
        self.display = display;
        self
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Check the parameters against the provider's accepted ranges
    pub fn validate(&self) -> Result<(), RadarError> {
        if self.query.is_empty() {
            return Err(RadarError::invalid_parameter("query must not be empty"));
        }
        if !(1..=MAX_DISPLAY).contains(&self.display) {
            return Err(RadarError::invalid_parameter(format!(
                "display must be between 1 and {}, got {}",
                MAX_DISPLAY, self.display
            )));
        }
        if !(1..=MAX_START).contains(&self.start) {
            return Err(RadarError::invalid_parameter(format!(
                "start must be between 1 and {}, got {}",
                MAX_START, self.start
            )));
        }
        Ok(())
    }
}
