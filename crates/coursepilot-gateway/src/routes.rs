//! API route handlers for the gateway.

use axum::http::StatusCode;
use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::server::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Request failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
}

/// Answer one question about the course materials.
pub async fn query_endpoint(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.query.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "query must not be empty" })),
        ));
    }

    let outcome = state
        .rag
        .query(&req.query, req.session_id.as_deref())
        .await
        .map_err(internal_error)?;

    Ok(Json(serde_json::json!({
        "answer": outcome.answer,
        "sources": outcome.sources,
        "session_id": outcome.session_id,
    })))
}

/// Catalog statistics: how many courses are loaded, and their titles.
pub async fn courses_endpoint(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let analytics = state.rag.course_analytics().map_err(internal_error)?;
    Ok(Json(serde_json::json!({
        "total_courses": analytics.total_courses,
        "course_titles": analytics.course_titles,
    })))
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "coursepilot-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}
