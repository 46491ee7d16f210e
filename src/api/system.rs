//! System endpoints: health check, status snapshot, connected clients.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: service health status.
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /status`: latest snapshot published by the processing context.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.status.borrow().clone();
    (StatusCode::OK, Json(snapshot))
}

/// `GET /clients`: connected control clients.
pub async fn clients_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.clients.list().await))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/clients", get(clients_handler))
}
