//! Network side of the control channel.
//!
//! Two transports feed the same [`crate::router::CommandRouter`]: a raw TCP
//! line listener ([`tcp`]) and a WebSocket control endpoint ([`ws`]). Both
//! register their clients in one [`ClientRegistry`] so replies and echoes
//! reach every client regardless of transport. A failing connection only
//! tears itself down.

pub mod clients;
pub mod messages;
pub mod tcp;
pub mod ws;

pub use clients::{ClientHandle, ClientInfo, ClientRegistry, TransportKind, run_outbox};
pub use messages::{WsMessage, WsMessageType};
