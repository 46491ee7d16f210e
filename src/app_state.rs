//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::context::StatusSnapshot;
use crate::domain::EventBus;
use crate::router::CommandRouter;
use crate::transport::ClientRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Router for protocol lines arriving on `/ws`.
    pub router: Arc<CommandRouter>,
    /// Connected control clients.
    pub clients: Arc<ClientRegistry>,
    /// Latest processing-context snapshot.
    pub status: watch::Receiver<StatusSnapshot>,
    /// Event bus for `/events` observers.
    pub event_bus: EventBus,
}
