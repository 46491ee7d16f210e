//! JSON envelope of the `/events` notification stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Notification;

/// Top-level envelope of every frame sent on `/events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Server-generated message id.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

/// Discriminator for [`WsMessage`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// A processing-context notification.
    Event,
    /// The observer fell behind and notifications were skipped.
    Error,
}

impl WsMessage {
    /// Wraps a notification.
    #[must_use]
    pub fn event(notification: &Notification) -> Self {
        Self::new(
            WsMessageType::Event,
            serde_json::to_value(notification).unwrap_or_default(),
        )
    }

    /// Reports `skipped` notifications lost to lag.
    #[must_use]
    pub fn lagged(skipped: u64) -> Self {
        Self::new(
            WsMessageType::Error,
            serde_json::json!({
                "code": 429,
                "message": "observer lagged behind event bus",
                "skipped": skipped,
            }),
        )
    }

    fn new(msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Serializes the envelope.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::{ControlEvent, Origin};

    #[test]
    fn event_envelope_carries_flattened_notification() {
        let note =
            Notification::now(Origin::Local, ControlEvent::StreamingChanged { enabled: true });
        let json: serde_json::Value =
            serde_json::from_str(&WsMessage::event(&note).to_json()).unwrap_or_default();

        assert_eq!(json["type"], "event");
        assert_eq!(json["payload"]["event_type"], "streaming_changed");
        assert_eq!(json["payload"]["enabled"], true);
        assert_eq!(json["payload"]["origin"]["kind"], "local");
    }

    #[test]
    fn lagged_envelope_reports_skipped_count() {
        let json: serde_json::Value =
            serde_json::from_str(&WsMessage::lagged(7).to_json()).unwrap_or_default();
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["skipped"], 7);
    }
}
