//! Subsystem command groups.
//!
//! Each group is a thin, cloneable handle over the marshaling queue. An
//! operation checks nothing beyond the shape of its arguments and raises a
//! typed event; every state change happens later, inside the processing
//! context, when that event is executed.

pub mod autotune;
pub mod calibration;
pub mod camera;
pub mod connection;
pub mod log;
pub mod settings;
pub mod stream;
pub mod viewer;
pub mod window;

pub use autotune::{AutotuneCommands, AutotuneEvent};
pub use calibration::{CalibrationCommands, CalibrationEvent};
pub use camera::{CameraCommands, CameraEvent};
pub use connection::{ConnectionCommands, ConnectionEvent};
pub use log::{LogCommands, LogEvent};
pub use settings::{SettingsCommands, SettingsEvent};
pub use stream::{StreamCommands, StreamEvent};
pub use viewer::{TrackerViewerCommands, ViewerEvent};
pub use window::{WindowCommands, WindowEvent};

use crate::marshal::MarshalSender;

/// Event raised by a subsystem operation and carried through the
/// marshaling queue.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// Calibration lifecycle and geometry.
    Calibration(CalibrationEvent),
    /// Camera selection.
    Camera(CameraEvent),
    /// Settings window.
    Settings(SettingsEvent),
    /// Video viewer and track box.
    Viewer(ViewerEvent),
    /// Autotune.
    Autotune(AutotuneEvent),
    /// Gaze data streaming.
    Stream(StreamEvent),
    /// Session log.
    Log(LogEvent),
    /// Window state.
    Window(WindowEvent),
    /// Client connections.
    Connection(ConnectionEvent),
}

impl TrackerEvent {
    /// Name of the subsystem that raised the event, for log fields.
    #[must_use]
    pub const fn subsystem(&self) -> &'static str {
        match self {
            Self::Calibration(_) => "calibration",
            Self::Camera(_) => "camera",
            Self::Settings(_) => "settings",
            Self::Viewer(_) => "tracker_viewer",
            Self::Autotune(_) => "autotune",
            Self::Stream(_) => "stream",
            Self::Log(_) => "log",
            Self::Window(_) => "window",
            Self::Connection(_) => "connection",
        }
    }
}

/// Every command group, wired to one marshaling queue.
///
/// Built once at start-up and handed to the command router.
#[derive(Debug, Clone)]
pub struct Subsystems {
    /// Calibration lifecycle and geometry.
    pub calibration: CalibrationCommands,
    /// Camera selection.
    pub camera: CameraCommands,
    /// Settings window.
    pub settings: SettingsCommands,
    /// Video viewer and track box.
    pub viewer: TrackerViewerCommands,
    /// Autotune.
    pub autotune: AutotuneCommands,
    /// Gaze data streaming.
    pub stream: StreamCommands,
    /// Session log.
    pub log: LogCommands,
    /// Window state.
    pub window: WindowCommands,
    /// Client connections.
    pub connection: ConnectionCommands,
}

impl Subsystems {
    /// Creates every group on top of `sink`.
    #[must_use]
    pub fn new(sink: &MarshalSender) -> Self {
        Self {
            calibration: CalibrationCommands::new(sink.clone()),
            camera: CameraCommands::new(sink.clone()),
            settings: SettingsCommands::new(sink.clone()),
            viewer: TrackerViewerCommands::new(sink.clone()),
            autotune: AutotuneCommands::new(sink.clone()),
            stream: StreamCommands::new(sink.clone()),
            log: LogCommands::new(sink.clone()),
            window: WindowCommands::new(sink.clone()),
            connection: ConnectionCommands::new(sink.clone()),
        }
    }
}
