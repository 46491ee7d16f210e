//! Read-only copy of the processing context's state.
//!
//! The context publishes a fresh [`StatusSnapshot`] through a
//! `tokio::sync::watch` channel after every idle slot that executed work.
//! Other threads only ever see these copies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CalibrationSession, CalibrationState, WindowState};

/// Calibration part of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalibrationStatus {
    /// Session state.
    pub state: CalibrationState,
    /// Attempt counter.
    pub attempt: u64,
    /// Area width.
    pub area_width: i32,
    /// Area height.
    pub area_height: i32,
    /// Parameter blob.
    pub parameters: String,
    /// Points recorded in the current attempt.
    pub points: usize,
    /// Quality of the current attempt.
    pub quality: Option<i32>,
    /// Recalibration method.
    pub update_method: i32,
}

impl From<&CalibrationSession> for CalibrationStatus {
    fn from(session: &CalibrationSession) -> Self {
        Self {
            state: session.state(),
            attempt: session.attempt(),
            area_width: session.area_width(),
            area_height: session.area_height(),
            parameters: session.parameters().to_string(),
            points: session.points().len(),
            quality: session.quality(),
            update_method: session.update_method(),
        }
    }
}

/// Everything an observer may want to know about the tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusSnapshot {
    /// Calibration session.
    pub calibration: CalibrationStatus,
    /// Gaze data streaming.
    pub streaming: bool,
    /// Session logging.
    pub logging: bool,
    /// Session log path.
    pub log_path: String,
    /// Main window state.
    pub window: WindowState,
    /// Settings window visibility.
    pub settings_visible: bool,
    /// Video viewer detached.
    pub video_detached: bool,
    /// Track box overlay visibility.
    pub track_box_visible: bool,
    /// Selected camera as `(device, mode)`.
    pub camera: Option<(i32, i32)>,
    /// Connected control clients.
    pub clients: usize,
    /// Work items executed since start-up.
    pub processed: u64,
    /// When the snapshot was taken.
    pub updated_at: DateTime<Utc>,
}
