//! Wire keywords understood or emitted by the tracker.

use std::fmt;
use std::str::FromStr;

/// Every keyword of the control protocol.
///
/// Most keywords are client → server commands; some (`CalibrationQuality`)
/// only appear on outgoing lines, and a few (`LogPathGet`, `LogWriteLine`,
/// `CalibrationParameters`) travel in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// Begin or restart a calibration.
    CalibrationStart,
    /// Abort the running calibration.
    CalibrationAbort,
    /// Opaque calibration parameter string.
    CalibrationParameters,
    /// Calibration display area (`<width> <height>`).
    CalibrationAreaSize,
    /// Accept the calibration result.
    CalibrationValidate,
    /// Recalibration method selection (`<method>`).
    CalibrationUpdateMethod,
    /// Calibration quality rating (outgoing only).
    CalibrationQuality,
    /// Enable gaze data streaming.
    StreamStart,
    /// Disable gaze data streaming.
    StreamStop,
    /// Enable session logging.
    LogStart,
    /// Disable session logging.
    LogStop,
    /// Query the log file path.
    LogPathGet,
    /// Set the log file path.
    LogPathSet,
    /// Append a line to the session log.
    LogWriteLine,
    /// Minimize the tracker windows.
    UiMinimize,
    /// Restore the tracker windows.
    UiRestore,
    /// Bring up the settings window.
    UiSettings,
    /// Select a camera device and mode.
    CameraChange,
    /// Detach the video viewer into its own window.
    VideoDetach,
    /// Show the track box overlay.
    TrackBoxShow,
    /// Hide the track box overlay.
    TrackBoxHide,
    /// Request an autotune pass.
    Autotune,
}

impl Keyword {
    /// All keywords, in protocol table order.
    pub const ALL: [Self; 22] = [
        Self::CalibrationStart,
        Self::CalibrationAbort,
        Self::CalibrationParameters,
        Self::CalibrationAreaSize,
        Self::CalibrationValidate,
        Self::CalibrationUpdateMethod,
        Self::CalibrationQuality,
        Self::StreamStart,
        Self::StreamStop,
        Self::LogStart,
        Self::LogStop,
        Self::LogPathGet,
        Self::LogPathSet,
        Self::LogWriteLine,
        Self::UiMinimize,
        Self::UiRestore,
        Self::UiSettings,
        Self::CameraChange,
        Self::VideoDetach,
        Self::TrackBoxShow,
        Self::TrackBoxHide,
        Self::Autotune,
    ];

    /// The keyword exactly as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CalibrationStart => "CalibrationStart",
            Self::CalibrationAbort => "CalibrationAbort",
            Self::CalibrationParameters => "CalibrationParameters",
            Self::CalibrationAreaSize => "CalibrationAreaSize",
            Self::CalibrationValidate => "CalibrationValidate",
            Self::CalibrationUpdateMethod => "CalibrationUpdateMethod",
            Self::CalibrationQuality => "CalibrationQuality",
            Self::StreamStart => "StreamStart",
            Self::StreamStop => "StreamStop",
            Self::LogStart => "LogStart",
            Self::LogStop => "LogStop",
            Self::LogPathGet => "LogPathGet",
            Self::LogPathSet => "LogPathSet",
            Self::LogWriteLine => "LogWriteLine",
            Self::UiMinimize => "UIMinimize",
            Self::UiRestore => "UIRestore",
            Self::UiSettings => "UISettings",
            Self::CameraChange => "CameraChange",
            Self::VideoDetach => "VideoDetach",
            Self::TrackBoxShow => "TrackBoxShow",
            Self::TrackBoxHide => "TrackBoxHide",
            Self::Autotune => "Autotune",
        }
    }

    /// Returns `true` if clients may send this keyword to the tracker.
    #[must_use]
    pub const fn is_incoming(self) -> bool {
        !matches!(self, Self::CalibrationQuality)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a protocol keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keyword: {0}")]
pub struct UnknownKeyword(pub String);

impl FromStr for Keyword {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKeyword(s.to_string()))
    }
}
