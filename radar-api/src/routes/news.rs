//! News search endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use radar_core::{NewsSearchParams, SortOrder};
use radar_news::{ArticleSource, NaverNewsItem, NewsError};

use super::error_response;
use crate::AppState;

/// Query parameters for news search
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// Search query
    pub query: Option<String>,
    /// Results per page (1-100)
    pub display: Option<u32>,
    /// Offset of the first result (1-1000)
    pub start: Option<u32>,
    /// "sim" (relevance) or "date" (most recent)
    pub sort: Option<String>,
}

impl NewsQuery {
    fn into_params(self) -> Result<NewsSearchParams, String> {
        let query = self.query.unwrap_or_default();
        let sort = match self.sort.as_deref() {
            Some(sort) => sort.parse::<SortOrder>().map_err(|e| e.to_string())?,
            None => SortOrder::Similarity,
        };

        let mut params = NewsSearchParams::new(query).with_sort(sort);
        if let Some(display) = self.display {
            params = params.with_display(display);
        }
        if let Some(start) = self.start {
            params = params.with_start(start);
        }

        params.validate().map_err(|e| e.to_string())?;
        Ok(params)
    }
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/news", get(search_news))
}

/// GET /api/news - Search Naver news, archive the results and return them
async fn search_news(State(state): State<AppState>, Query(query): Query<NewsQuery>) -> Response {
    let params = match query.into_params() {
        Ok(params) => params,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    if let Err(e) = state.naver.ensure_configured() {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    state.limiter.acquire().await;

    match state.naver.search_news(&params).await {
        Ok(payload) => {
            if let Some(archive) = &state.archive {
                let articles: Vec<_> = payload
                    .items
                    .iter()
                    .cloned()
                    .map(NaverNewsItem::into_article)
                    .collect();
                match archive.store_articles(&articles) {
                    Ok(stored) => info!("Archived {} new articles for '{}'", stored, params.query),
                    Err(e) => error!("Failed to archive articles: {}", e),
                }
            }
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(e) => news_error_response(e),
    }
}

/// Map a search failure to a response, passing upstream statuses and bodies through
fn news_error_response(err: NewsError) -> Response {
    warn!("News search failed: {}", err);
    let text = err.to_string();
    match err {
        NewsError::ApiError { status, message } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            let detail = serde_json::from_str::<serde_json::Value>(&message)
                .unwrap_or(serde_json::Value::String(message));
            error_response(status, detail)
        }
        NewsError::InvalidRequest(_) => error_response(StatusCode::BAD_REQUEST, text),
        NewsError::MissingCredentials(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR, text),
        NewsError::RequestFailed(_) | NewsError::ParseError(_) => {
            error_response(StatusCode::BAD_GATEWAY, text)
        }
    }
}
