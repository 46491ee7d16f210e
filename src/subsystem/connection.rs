//! Connection lifecycle notifications from the transports.

use crate::domain::{ClientId, Origin};
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`ConnectionCommands`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A client connected.
    Opened {
        /// Peer address as reported by the transport.
        peer: String,
    },
    /// A client connection ended (peer close, read or write failure).
    Closed {
        /// Human readable reason.
        reason: String,
    },
}

/// Lets transports tell the processing context about clients coming and
/// going.
#[derive(Debug, Clone)]
pub struct ConnectionCommands {
    sink: MarshalSender,
}

impl ConnectionCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    /// Reports a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn opened(&self, client: ClientId, peer: &str) -> Result<(), ControlError> {
        self.sink.enqueue(
            Origin::Client(client),
            TrackerEvent::Connection(ConnectionEvent::Opened {
                peer: peer.to_string(),
            }),
        )
    }

    /// Reports a closed connection.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn closed(&self, client: ClientId, reason: &str) -> Result<(), ControlError> {
        self.sink.enqueue(
            Origin::Client(client),
            TrackerEvent::Connection(ConnectionEvent::Closed {
                reason: reason.to_string(),
            }),
        )
    }
}
