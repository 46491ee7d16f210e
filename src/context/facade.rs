//! Collaborator interfaces of the processing context.
//!
//! The tracker engine, windows and settings persistence are outside this
//! crate. The context talks to them only through [`TrackerFacade`] and
//! [`SettingsStore`], always from its own thread.

use std::fmt;

use serde::Serialize;

use crate::domain::Origin;
use crate::subsystem::CalibrationCommands;

use super::{CalibrationSession, CalibrationState};

/// Visible state of the tracker's main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    /// Restored / normal.
    #[default]
    Normal,
    /// Minimized.
    Minimized,
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Minimized => f.write_str("minimized"),
        }
    }
}

/// The tracker engine and its windows, as seen from the control layer.
///
/// Every hook has a no-op default so implementations only override what
/// they care about.
pub trait TrackerFacade: Send {
    /// Per-frame processing. Runs before any marshaled work in the same
    /// frame.
    fn process_frame(&mut self) {}

    /// The calibration session entered `state`.
    fn calibration_changed(&mut self, _state: CalibrationState, _session: &CalibrationSession) {}

    /// Gaze data streaming toggled.
    fn set_streaming(&mut self, _enabled: bool) {}

    /// A different camera was selected.
    fn set_camera(&mut self, _device: i32, _mode: i32) {}

    /// Main and settings windows should take `state`.
    fn set_window_state(&mut self, _state: WindowState) {}

    /// The settings window should be shown.
    fn show_settings(&mut self) {}

    /// The video preview should be detached.
    fn detach_video(&mut self) {}

    /// The track box overlay should be shown or hidden.
    fn set_track_box_visible(&mut self, _visible: bool) {}

    /// An autotune pass should run.
    fn autotune(&mut self) {}
}

/// Calibration geometry and parameter persistence.
pub trait SettingsStore: Send {
    /// Persisted calibration area as `(width, height)`.
    fn calibration_area(&self) -> (i32, i32);

    /// Persists the calibration area.
    fn set_calibration_area(&mut self, width: i32, height: i32);

    /// Persisted calibration parameter blob.
    fn calibration_parameters(&self) -> String;

    /// Persists the calibration parameter blob.
    fn set_calibration_parameters(&mut self, blob: &str);

    /// Persists the recalibration method.
    fn set_recalibration_method(&mut self, method: i32);

    /// Persists the selected camera.
    fn set_camera(&mut self, device: i32, mode: i32);
}

/// Facade used when no tracker engine is attached: every hook is logged.
///
/// With a presenter attached, a `Started` attempt is reported as running
/// straight away, standing in for a calibration window that is up at once.
#[derive(Debug, Default)]
pub struct HeadlessTracker {
    frames: u64,
    presenter: Option<CalibrationCommands>,
}

impl HeadlessTracker {
    /// Creates the headless facade. Started attempts stay `Started` until
    /// something else raises `running`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the headless facade that raises `running` on every start.
    ///
    /// The facade keeps a queue producer alive, so a context owning it only
    /// stops through its shutdown flag.
    #[must_use]
    pub fn with_presenter(presenter: CalibrationCommands) -> Self {
        Self {
            frames: 0,
            presenter: Some(presenter),
        }
    }

    /// Frames processed so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl TrackerFacade for HeadlessTracker {
    fn process_frame(&mut self) {
        self.frames = self.frames.wrapping_add(1);
    }

    fn calibration_changed(&mut self, state: CalibrationState, session: &CalibrationSession) {
        tracing::info!(
            %state,
            attempt = session.attempt(),
            points = session.points().len(),
            "calibration"
        );
        if state == CalibrationState::Started
            && let Some(presenter) = &self.presenter
            && let Err(err) = presenter.running(Origin::Local)
        {
            tracing::warn!(error = %err, "calibration presenter could not report running");
        }
    }

    fn set_streaming(&mut self, enabled: bool) {
        tracing::info!(enabled, "gaze streaming");
    }

    fn set_camera(&mut self, device: i32, mode: i32) {
        tracing::info!(device, mode, "camera selected");
    }

    fn set_window_state(&mut self, state: WindowState) {
        tracing::info!(%state, "window state");
    }

    fn show_settings(&mut self) {
        tracing::info!("settings window shown");
    }

    fn detach_video(&mut self) {
        tracing::info!("video viewer detached");
    }

    fn set_track_box_visible(&mut self, visible: bool) {
        tracing::info!(visible, "track box");
    }

    fn autotune(&mut self) {
        tracing::info!("autotune requested");
    }
}

/// Settings kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InMemorySettings {
    /// Calibration area width.
    pub area_width: i32,
    /// Calibration area height.
    pub area_height: i32,
    /// Calibration parameter blob.
    pub parameters: String,
    /// Recalibration method.
    pub recalibration_method: i32,
    /// Selected camera as `(device, mode)`.
    pub camera: Option<(i32, i32)>,
}

impl InMemorySettings {
    /// Creates settings with the given calibration area.
    #[must_use]
    pub fn with_area(width: i32, height: i32) -> Self {
        Self {
            area_width: width,
            area_height: height,
            ..Self::default()
        }
    }
}

impl SettingsStore for InMemorySettings {
    fn calibration_area(&self) -> (i32, i32) {
        (self.area_width, self.area_height)
    }

    fn set_calibration_area(&mut self, width: i32, height: i32) {
        self.area_width = width;
        self.area_height = height;
    }

    fn calibration_parameters(&self) -> String {
        self.parameters.clone()
    }

    fn set_calibration_parameters(&mut self, blob: &str) {
        blob.clone_into(&mut self.parameters);
    }

    fn set_recalibration_method(&mut self, method: i32) {
        self.recalibration_method = method;
    }

    fn set_camera(&mut self, device: i32, mode: i32) {
        self.camera = Some((device, mode));
    }
}
