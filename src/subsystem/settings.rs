//! Settings command group.

use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`SettingsCommands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    /// The settings window should be shown.
    Opened,
}

/// Stateless settings trigger.
#[derive(Debug, Clone)]
pub struct SettingsCommands {
    sink: MarshalSender,
}

impl SettingsCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    /// Requests the settings window.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn open(&self, origin: Origin) -> Result<(), ControlError> {
        self.sink
            .enqueue(origin, TrackerEvent::Settings(SettingsEvent::Opened))
    }
}
