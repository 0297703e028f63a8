//! On-demand keyword analysis endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};

use radar_core::Depth;
use radar_services::DISASTER_SEED_KEYWORDS;

use super::error_response;
use crate::AppState;

/// Query parameters for keyword analysis
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// Expansion depth (1-5, default 2)
    pub depth: Option<usize>,
    /// Comma-separated seed keywords (defaults to the disaster seed set)
    pub keywords: Option<String>,
}

impl AnalysisQuery {
    fn depth(&self) -> Result<Depth, String> {
        match self.depth {
            Some(rounds) => Depth::new(rounds).map_err(|e| e.to_string()),
            None => Ok(Depth::default()),
        }
    }

    fn seed_keywords(&self) -> Vec<String> {
        let custom: Vec<String> = self
            .keywords
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        if custom.is_empty() {
            DISASTER_SEED_KEYWORDS.iter().map(|k| k.to_string()).collect()
        } else {
            custom
        }
    }
}

/// Create analysis routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/keywords/analyze", get(analyze_keywords))
}

/// GET /api/keywords/analyze - Run recursive keyword expansion and return every depth
async fn analyze_keywords(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Response {
    let depth = match query.depth() {
        Ok(depth) => depth,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };
    let seed = query.seed_keywords();

    info!("On-demand keyword analysis: depth={}, seed={:?}", depth, seed);

    match state.engine.expand(seed, depth).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        // Missing credentials end up here, before any search was made
        Err(e) => {
            error!("Keyword analysis failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
