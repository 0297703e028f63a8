//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    naver_configured: bool,
    archived_articles: Option<i64>,
    naver_requests: u64,
    naver_requests_waited: u64,
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let naver_configured = state.naver.has_credentials();
    let archived_articles = state
        .archive
        .as_ref()
        .and_then(|archive| archive.count().ok());
    let pacing = state.limiter.stats();

    let (code, status) = if naver_configured {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status: status.to_string(),
        naver_configured,
        archived_articles,
        naver_requests: pacing.total_requests,
        naver_requests_waited: pacing.waited_requests,
    };

    (code, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
