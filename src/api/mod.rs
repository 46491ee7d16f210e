//! HTTP layer: system endpoints and the WebSocket upgrades.

pub mod system;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::transport::ws::{control_handler, events_handler};

/// Builds the route table without state.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .route("/ws", get(control_handler))
        .route("/events", get(events_handler))
}

/// Builds the complete application with tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tokio::sync::watch;
    use tower::ServiceExt;

    use super::*;
    use crate::context::StatusSnapshot;
    use crate::domain::EventBus;
    use crate::marshal;
    use crate::router::{CommandRegistry, CommandRouter};
    use crate::subsystem::Subsystems;
    use crate::transport::ClientRegistry;

    fn state(snapshot: StatusSnapshot) -> AppState {
        let (sink, _queue) = marshal::channel();
        let (_tx, status) = watch::channel(snapshot);
        AppState {
            router: Arc::new(CommandRouter::new(
                Arc::new(CommandRegistry::standard()),
                Subsystems::new(&sink),
            )),
            clients: Arc::new(ClientRegistry::new()),
            status,
            event_bus: EventBus::new(16),
        }
    }

    async fn send(app: Router, uri: &str) -> axum::response::Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap_or_default();
        match app.oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = send(app, uri).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap_or_default();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = get_json(app(state(StatusSnapshot::default())), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn status_returns_latest_snapshot() {
        let snapshot = StatusSnapshot {
            streaming: true,
            log_path: "session.log".to_string(),
            ..StatusSnapshot::default()
        };
        let (status, body) = get_json(app(state(snapshot)), "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["streaming"], true);
        assert_eq!(body["log_path"], "session.log");
        assert_eq!(body["calibration"]["state"], "idle");
    }

    #[tokio::test]
    async fn clients_empty_list() {
        let (status, body) = get_json(app(state(StatusSnapshot::default())), "/clients").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = send(app(state(StatusSnapshot::default())), "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
