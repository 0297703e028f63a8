//! Disaster News Radar API Server
//!
//! HTTP API server for news search and recursive keyword analysis, plus the
//! daily scheduled analysis run.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use radar_news::NaverNewsClient;
use radar_services::{
    AnalysisScheduleConfig, AnalysisScheduler, ExpansionEngine, HangulNounExtractor, NewsArchive,
    RateLimitedSource, RateLimiter,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub naver: Arc<NaverNewsClient>,
    /// Shared pacing for every Naver request (API and engine)
    pub limiter: Arc<RateLimiter>,
    pub engine: Arc<ExpansionEngine>,
    /// Article archive (optional - analysis works without it)
    pub archive: Option<Arc<NewsArchive>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables; missing files are not an error
    for file in [".env.local", ".env"] {
        if let Err(e) = dotenvy::from_filename(file) {
            if !e.not_found() {
                eprintln!("Warning: Failed to load {}: {}", file, e);
            }
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,radar_api=debug")),
        )
        .init();

    info!("Starting Disaster News Radar API");

    // Missing credentials are reported per request, not at startup
    let naver = Arc::new(NaverNewsClient::from_env());
    if naver.has_credentials() {
        info!("Naver API credentials found in environment");
    } else {
        warn!("NAVER_CLIENT_ID / NAVER_CLIENT_SECRET not set - news and analysis requests will fail");
    }

    let limiter = match std::env::var("NAVER_MIN_REQUEST_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        Some(ms) => Arc::new(RateLimiter::new(ms, "Naver")),
        None => RateLimiter::for_naver(),
    };
    info!("Naver requests spaced {:?} apart", limiter.min_interval());

    let source = Arc::new(RateLimitedSource::new(naver.clone(), limiter.clone()));
    let engine = Arc::new(ExpansionEngine::new(
        source,
        Arc::new(HangulNounExtractor::new()),
    ));

    // Initialize article archive (SQLite)
    let db_path = std::env::var("NEWS_DB_PATH").unwrap_or_else(|_| "data/news.db".to_string());
    let archive = match NewsArchive::new(&db_path) {
        Ok(archive) => Some(Arc::new(archive)),
        Err(e) => {
            warn!("News archive unavailable at {}: {}. Articles will not be archived.", db_path, e);
            None
        }
    };

    // Scheduled analysis: once shortly after startup, then daily
    let schedule_config = AnalysisScheduleConfig::from_env()?;
    let scheduler = Arc::new(AnalysisScheduler::new(engine.clone(), schedule_config));
    scheduler.start();

    let state = AppState {
        naver,
        limiter,
        engine,
        archive,
    };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // Build router
    let app = Router::new()
        .merge(routes::root_routes())
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
