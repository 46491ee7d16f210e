//! Notifications emitted after the processing context changed state.
//!
//! Every applied [`crate::subsystem::TrackerEvent`] that has an observable
//! effect publishes a [`ControlEvent`] through the [`super::EventBus`].
//! Observers (the `/events` WebSocket, tests) receive them fire-and-forget.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClientId, Origin};
use crate::context::{CalibrationState, PointFeedback, WindowState};

/// Post-change notification payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ControlEvent {
    /// The calibration session entered a new state.
    CalibrationStateChanged {
        /// State just entered.
        state: CalibrationState,
        /// Attempt counter of the session.
        attempt: u64,
    },

    /// Calibration area geometry was replaced.
    CalibrationAreaChanged {
        /// New width in pixels.
        width: i32,
        /// New height in pixels.
        height: i32,
    },

    /// Opaque calibration parameter string was replaced.
    CalibrationParametersChanged {
        /// New parameter blob.
        parameters: String,
    },

    /// A feedback point was appended to the running session.
    CalibrationPointRecorded {
        /// The recorded point.
        point: PointFeedback,
        /// Number of points in the session after the append.
        total: usize,
    },

    /// The tracker reported a quality rating for the calibration.
    CalibrationQuality {
        /// Rating value as reported by the tracker.
        rating: i32,
    },

    /// The recalibration method changed.
    CalibrationMethodChanged {
        /// Method number.
        method: i32,
    },

    /// A different camera device or mode was selected.
    CameraChanged {
        /// Device index.
        device: i32,
        /// Device mode index.
        mode: i32,
    },

    /// The settings window was opened.
    SettingsOpened,

    /// The video viewer was detached into its own window.
    VideoDetached,

    /// The track box overlay was shown or hidden.
    TrackBoxVisibility {
        /// Whether the overlay is now visible.
        visible: bool,
    },

    /// An autotune pass was requested.
    AutotuneRequested,

    /// Gaze data streaming was toggled.
    StreamingChanged {
        /// Whether streaming is now enabled.
        enabled: bool,
    },

    /// Session logging was toggled.
    LoggingChanged {
        /// Whether logging is now enabled.
        enabled: bool,
    },

    /// The session log path changed.
    LogPathChanged {
        /// New path.
        path: String,
    },

    /// The main window state changed.
    WindowStateChanged {
        /// New window state.
        state: WindowState,
    },

    /// A control client connected.
    ClientConnected {
        /// Connection id.
        client: ClientId,
        /// Peer address.
        peer: String,
    },

    /// A control client went away.
    ClientDisconnected {
        /// Connection id.
        client: ClientId,
        /// Why the connection ended.
        reason: String,
    },
}

impl ControlEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::CalibrationStateChanged { .. } => "calibration_state_changed",
            Self::CalibrationAreaChanged { .. } => "calibration_area_changed",
            Self::CalibrationParametersChanged { .. } => "calibration_parameters_changed",
            Self::CalibrationPointRecorded { .. } => "calibration_point_recorded",
            Self::CalibrationQuality { .. } => "calibration_quality",
            Self::CalibrationMethodChanged { .. } => "calibration_method_changed",
            Self::CameraChanged { .. } => "camera_changed",
            Self::SettingsOpened => "settings_opened",
            Self::VideoDetached => "video_detached",
            Self::TrackBoxVisibility { .. } => "track_box_visibility",
            Self::AutotuneRequested => "autotune_requested",
            Self::StreamingChanged { .. } => "streaming_changed",
            Self::LoggingChanged { .. } => "logging_changed",
            Self::LogPathChanged { .. } => "log_path_changed",
            Self::WindowStateChanged { .. } => "window_state_changed",
            Self::ClientConnected { .. } => "client_connected",
            Self::ClientDisconnected { .. } => "client_disconnected",
        }
    }
}

/// A [`ControlEvent`] stamped with time and origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// When the context applied the change.
    pub timestamp: DateTime<Utc>,
    /// Who caused the change.
    pub origin: Origin,
    /// What changed.
    #[serde(flatten)]
    pub event: ControlEvent,
}

impl Notification {
    /// Stamps `event` with the current time.
    #[must_use]
    pub fn now(origin: Origin, event: ControlEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            origin,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_change_event_type() {
        let event = ControlEvent::CalibrationStateChanged {
            state: CalibrationState::Running,
            attempt: 1,
        };
        assert_eq!(event.event_type_str(), "calibration_state_changed");
    }

    #[test]
    fn notification_serializes_flat() {
        let note = Notification::now(
            Origin::Local,
            ControlEvent::CalibrationAreaChanged {
                width: 800,
                height: 600,
            },
        );
        let json = serde_json::to_string(&note).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"calibration_area_changed\""));
        assert!(json.contains("\"width\":800"));
        assert!(json.contains("\"kind\":\"local\""));
    }

    #[test]
    fn client_origin_serializes_id() {
        let id = ClientId::new();
        let note = Notification::now(Origin::Client(id), ControlEvent::SettingsOpened);
        let json = serde_json::to_string(&note).unwrap_or_default();
        assert!(json.contains(&id.to_string()));
    }
}
