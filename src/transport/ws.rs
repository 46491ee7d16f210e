//! WebSocket endpoints.
//!
//! - `GET /ws`: control channel. Text frames carry one or more protocol
//!   lines and are handled exactly like TCP input. A frame larger than
//!   [`MAX_LINE_BYTES`] closes the connection. Outgoing lines are sent
//!   one per text frame.
//! - `GET /events`: read-only stream of processing-context notifications as
//!   JSON [`WsMessage`] envelopes.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};

use super::messages::WsMessage;
use super::{ClientHandle, ClientRegistry, TransportKind};
use crate::app_state::AppState;
use crate::domain::{ClientId, Notification, Origin};
use crate::protocol::MAX_LINE_BYTES;
use crate::router::CommandRouter;

/// `GET /ws`: upgrade to a control connection.
pub async fn control_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let router = Arc::clone(&state.router);
    let clients = Arc::clone(&state.clients);
    ws.max_message_size(MAX_LINE_BYTES)
        .on_upgrade(move |socket| run_control(socket, peer, router, clients))
}

/// `GET /events`: upgrade to a notification stream.
pub async fn events_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    tracing::debug!(observers = state.event_bus.receiver_count(), "events observer attached");
    ws.on_upgrade(move |socket| run_events(socket, event_rx))
}

/// Read/write loop of one WebSocket control client.
pub async fn run_control(
    socket: WebSocket,
    peer: SocketAddr,
    router: Arc<CommandRouter>,
    clients: Arc<ClientRegistry>,
) {
    let client = ClientId::new();
    let peer = peer.to_string();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    clients
        .register(
            client,
            ClientHandle {
                peer: peer.clone(),
                kind: TransportKind::WebSocket,
                tx,
            },
        )
        .await;
    router.connection_opened(client, &peer);
    let origin = Origin::Client(client);

    let (mut ws_tx, mut ws_rx) = socket.split();

    let reason = loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => dispatch_frame(&router, origin, text.as_str()),
                    Some(Ok(Message::Binary(bytes))) => {
                        dispatch_frame(&router, origin, &String::from_utf8_lossy(&bytes));
                    }
                    Some(Ok(Message::Close(_))) | None => break "peer closed".to_string(),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => break format!("read failed: {err}"),
                }
            }
            outgoing = rx.recv() => {
                let Some(line) = outgoing else {
                    break "dropped by registry".to_string();
                };
                if let Err(err) = ws_tx.send(Message::text(line)).await {
                    break format!("write failed: {err}");
                }
            }
        }
    };

    clients.unregister(client).await;
    router.connection_closed(client, &reason);
    tracing::debug!(%client, %peer, %reason, "ws control connection closed");
}

fn dispatch_frame(router: &CommandRouter, origin: Origin, frame: &str) {
    for line in frame.split('\n') {
        router.dispatch_line(origin, line);
    }
}

/// Forwards notifications to one observer until it disconnects.
pub async fn run_events(socket: WebSocket, mut event_rx: broadcast::Receiver<Notification>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            event = event_rx.recv() => {
                let envelope = match event {
                    Ok(notification) => WsMessage::event(&notification),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "events observer lagged behind event bus");
                        WsMessage::lagged(n)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if ws_tx.send(Message::text(envelope.to_json())).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("events observer closed");
}
