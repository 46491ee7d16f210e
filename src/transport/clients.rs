//! Connected control clients and the outgoing line fan-out.
//!
//! Each connection task registers an unbounded line channel here. The
//! fan-out task ([`run_outbox`]) reads [`OutgoingMessage`]s produced by the
//! processing context and pushes the rendered line into the channel of every
//! client in the message's audience. Sends never block the producer; a
//! client whose channel is gone is logged and dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, mpsc};

use crate::domain::ClientId;
use crate::protocol::OutgoingMessage;

/// How a control client is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Raw TCP, newline-delimited.
    Tcp,
    /// WebSocket text frames.
    WebSocket,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::WebSocket => f.write_str("websocket"),
        }
    }
}

/// Registry entry for one connected client.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    /// Peer address as reported by the transport.
    pub peer: String,
    /// Transport the client uses.
    pub kind: TransportKind,
    /// Outgoing lines, without terminator.
    pub tx: mpsc::UnboundedSender<String>,
}

/// Public view of a registered client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    /// Client id.
    pub id: ClientId,
    /// Peer address.
    pub peer: String,
    /// Transport.
    pub kind: TransportKind,
}

/// All currently connected control clients.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<ClientId, ClientHandle>>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client. A second registration under the same id replaces the
    /// first.
    pub async fn register(&self, id: ClientId, handle: ClientHandle) {
        tracing::debug!(
            client = %id,
            peer = %handle.peer,
            kind = %handle.kind,
            "client registered"
        );
        self.clients.write().await.insert(id, handle);
    }

    /// Removes a client. Returns `false` if it was not registered.
    pub async fn unregister(&self, id: ClientId) -> bool {
        self.clients.write().await.remove(&id).is_some()
    }

    /// Number of registered clients.
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Returns `true` if no client is registered.
    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }

    /// Lists the registered clients.
    pub async fn list(&self) -> Vec<ClientInfo> {
        let map = self.clients.read().await;
        map.iter()
            .map(|(id, handle)| ClientInfo {
                id: *id,
                peer: handle.peer.clone(),
                kind: handle.kind,
            })
            .collect()
    }

    /// Hands `message` to every client in its audience. Returns the number
    /// of clients it was handed to.
    pub async fn deliver(&self, message: &OutgoingMessage) -> usize {
        let line = message.to_line();
        let mut delivered = 0_usize;
        let mut dead = Vec::new();

        {
            let map = self.clients.read().await;
            for (id, handle) in map.iter().filter(|(id, _)| message.audience.includes(**id)) {
                if handle.tx.send(line.clone()).is_ok() {
                    delivered = delivered.saturating_add(1);
                } else {
                    tracing::warn!(
                        client = %id,
                        peer = %handle.peer,
                        keyword = %message.keyword,
                        "send failed; dropping client"
                    );
                    dead.push(*id);
                }
            }
        }

        if !dead.is_empty() {
            let mut map = self.clients.write().await;
            for id in dead {
                map.remove(&id);
            }
        }

        delivered
    }
}

/// Delivers outgoing messages until every producer is gone.
pub async fn run_outbox(
    mut outbox: mpsc::UnboundedReceiver<OutgoingMessage>,
    clients: Arc<ClientRegistry>,
) {
    while let Some(message) = outbox.recv().await {
        let delivered = clients.deliver(&message).await;
        tracing::trace!(keyword = %message.keyword, delivered, "outgoing line delivered");
    }
    tracing::debug!("outbox closed");
}
