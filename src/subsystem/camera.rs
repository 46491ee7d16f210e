//! Camera command group.

use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`CameraCommands`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    /// A camera device/mode was selected.
    Changed {
        /// Device index.
        device: i32,
        /// Device mode index.
        mode: i32,
    },
}

/// Stateless camera trigger.
#[derive(Debug, Clone)]
pub struct CameraCommands {
    sink: MarshalSender,
}

impl CameraCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    /// Announces a camera change.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn change(&self, origin: Origin, device: i32, mode: i32) -> Result<(), ControlError> {
        self.sink.enqueue(
            origin,
            TrackerEvent::Camera(CameraEvent::Changed { device, mode }),
        )
    }
}
