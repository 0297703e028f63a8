//! Naver Open API client for news search

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use radar_core::{Article, NewsSearchParams};

use crate::error::NewsError;
use crate::source::ArticleSource;
use crate::types::{NaverErrorBody, NaverNewsItem, NaverSearchResponse};

const NAVER_NEWS_URL: &str = "https://openapi.naver.com/v1/search/news.json";

/// Naver application credentials
#[derive(Debug, Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl NaverCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load credentials from the environment
    ///
    /// Expects:
    /// - NAVER_CLIENT_ID
    /// - NAVER_CLIENT_SECRET
    ///
    /// Returns `None` when either is unset or blank.
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("NAVER_CLIENT_ID").ok()?;
        let client_secret = env::var("NAVER_CLIENT_SECRET").ok()?;
        Self::new(client_id, client_secret).validated()
    }

    fn validated(self) -> Option<Self> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Naver news search client
pub struct NaverNewsClient {
    client: Client,
    credentials: Option<NaverCredentials>,
    base_url: String,
}

impl NaverNewsClient {
    /// Create a new client; missing credentials are reported per request
    pub fn new(credentials: Option<NaverCredentials>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            credentials: credentials.and_then(NaverCredentials::validated),
            base_url: NAVER_NEWS_URL.to_string(),
        }
    }

    /// Create a client from `NAVER_CLIENT_ID` / `NAVER_CLIENT_SECRET`
    pub fn from_env() -> Self {
        Self::new(NaverCredentials::from_env())
    }

    /// Override the endpoint (e.g. a local proxy)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&NaverCredentials, NewsError> {
        self.credentials.as_ref().ok_or_else(|| {
            NewsError::MissingCredentials(
                "NAVER_CLIENT_ID and NAVER_CLIENT_SECRET must be set".to_string(),
            )
        })
    }

    /// Search news and return the full response with highlight markup removed
    #[instrument(skip(self), fields(query = %params.query, sort = %params.sort))]
    pub async fn search_news(
        &self,
        params: &NewsSearchParams,
    ) -> Result<NaverSearchResponse, NewsError> {
        let credentials = self.credentials()?;
        params.validate()?;

        let display = params.display.to_string();
        let start = params.start.to_string();
        let query = [
            ("query", params.query.as_str()),
            ("display", display.as_str()),
            ("start", start.as_str()),
            ("sort", params.sort.as_str()),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .header("X-Naver-Client-Id", &credentials.client_id)
            .header("X-Naver-Client-Secret", &credentials.client_secret)
            .query(&query)
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, body));
        }

        let mut payload: NaverSearchResponse = response
            .json()
            .await
            .map_err(|e| NewsError::ParseError(e.to_string()))?;

        for item in &mut payload.items {
            item.strip_markup();
        }

        info!(
            "Received {} of {} results from Naver",
            payload.items.len(),
            payload.total
        );

        Ok(payload)
    }
}

/// Build an error carrying the upstream status and body unchanged
fn api_error(status: StatusCode, body: String) -> NewsError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("Naver rate limit hit");
    }
    if let Ok(parsed) = serde_json::from_str::<NaverErrorBody>(&body) {
        warn!(
            "Naver search failed: status={}, code={}, message={}",
            status, parsed.error_code, parsed.error_message
        );
    }
    NewsError::ApiError {
        status: status.as_u16(),
        message: body,
    }
}

#[async_trait]
impl ArticleSource for NaverNewsClient {
    fn ensure_configured(&self) -> Result<(), NewsError> {
        self.credentials().map(|_| ())
    }

    async fn search(&self, params: &NewsSearchParams) -> Result<Vec<Article>, NewsError> {
        let payload = self.search_news(params).await?;
        let articles: Vec<Article> = payload
            .items
            .into_iter()
            .map(NaverNewsItem::into_article)
            .collect();

        for article in &articles {
            debug!(
                "Article: title='{}', description='{}'",
                article.title.chars().take(60).collect::<String>(),
                article.description.chars().take(80).collect::<String>()
            );
        }

        Ok(articles)
    }
}
