//! Gaze data streaming toggle.

use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`StreamCommands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Start streaming gaze data.
    Start,
    /// Stop streaming gaze data.
    Stop,
}

/// Streaming on/off triggers.
#[derive(Debug, Clone)]
pub struct StreamCommands {
    sink: MarshalSender,
}

impl StreamCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    /// Enables streaming.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn start(&self, origin: Origin) -> Result<(), ControlError> {
        self.sink.enqueue(origin, TrackerEvent::Stream(StreamEvent::Start))
    }

    /// Disables streaming.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn stop(&self, origin: Origin) -> Result<(), ControlError> {
        self.sink.enqueue(origin, TrackerEvent::Stream(StreamEvent::Stop))
    }
}
