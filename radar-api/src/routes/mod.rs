//! API route definitions

mod analysis;
mod health;
mod news;

use axum::{http::StatusCode, response::IntoResponse, response::Response, routing::get, Json, Router};

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(news::routes())
        .merge(analysis::routes())
        .merge(health::routes())
}

/// Create routes served outside `/api`
pub fn root_routes() -> Router<AppState> {
    Router::new().route("/", get(root))
}

/// GET / - identify the server
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Disaster News Radar API server"
    }))
}

/// JSON error body with the given status
fn error_response(status: StatusCode, detail: impl Into<serde_json::Value>) -> Response {
    (status, Json(serde_json::json!({ "error": detail.into() }))).into_response()
}
