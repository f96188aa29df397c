//! HTTP server implementation using Axum.

use axum::response::Html;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use coursepilot_agent::RagSystem;
use coursepilot_core::config::GatewayConfig;

/// Shared state for the gateway server.
pub struct AppState {
    pub rag: Arc<RagSystem>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(rag: Arc<RagSystem>) -> Self {
        Self {
            rag,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Serve the embedded chat page.
async fn chat_page() -> Html<&'static str> {
    Html(super::frontend::chat_html())
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/query", post(super::routes::query_endpoint))
        .route("/api/courses", get(super::routes::courses_endpoint))
        .route("/health", get(super::routes::health_check));

    let public = Router::new()
        .route("/", get(chat_page))
        .fallback(get(chat_page));

    api.merge(public)
        .layer({
            let cors = CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(Any)
                .max_age(std::time::Duration::from_secs(3600));

            // Restrict CORS origins in production via env var
            // Example: COURSEPILOT_CORS_ORIGINS=https://courses.example.com
            if let Ok(origins_str) = std::env::var("COURSEPILOT_CORS_ORIGINS") {
                let origins: Vec<_> = origins_str
                    .split(',')
                    .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
                    .collect();
                cors.allow_origin(origins)
            } else {
                cors.allow_origin(Any)
            }
        })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server. Runs until the process exits.
pub async fn start(rag: Arc<RagSystem>, config: &GatewayConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(rag));
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Gateway server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
