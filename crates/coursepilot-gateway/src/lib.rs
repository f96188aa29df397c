//! # CoursePilot Gateway
//!
//! HTTP API over the RAG system, plus an embedded single-page chat UI.
//!
//! Endpoints:
//! - `POST /api/query` — answer a question, with sources and session id
//! - `GET /api/courses` — catalog statistics
//! - `GET /health` — liveness probe
//! - `GET /` — the chat page

pub mod frontend;
pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
