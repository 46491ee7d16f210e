//! Tracker viewer command group: video window and track box overlay.

use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`TrackerViewerCommands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Detach the video preview into its own window.
    VideoDetach,
    /// Show the track box overlay.
    TrackBoxShow,
    /// Hide the track box overlay.
    TrackBoxHide,
}

/// Stateless viewer triggers.
#[derive(Debug, Clone)]
pub struct TrackerViewerCommands {
    sink: MarshalSender,
}

impl TrackerViewerCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    fn raise(&self, origin: Origin, event: ViewerEvent) -> Result<(), ControlError> {
        self.sink.enqueue(origin, TrackerEvent::Viewer(event))
    }

    /// Requests the video preview to be detached.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn detach_video(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, ViewerEvent::VideoDetach)
    }

    /// Requests the track box overlay.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn show_track_box(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, ViewerEvent::TrackBoxShow)
    }

    /// Hides the track box overlay.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn hide_track_box(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, ViewerEvent::TrackBoxHide)
    }
}
