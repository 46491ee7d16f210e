//! Autotune command group.

use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`AutotuneCommands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutotuneEvent {
    /// An autotune pass was requested.
    Requested,
}

/// Stateless autotune trigger.
#[derive(Debug, Clone)]
pub struct AutotuneCommands {
    sink: MarshalSender,
}

impl AutotuneCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    /// Requests an autotune pass.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn run(&self, origin: Origin) -> Result<(), ControlError> {
        self.sink
            .enqueue(origin, TrackerEvent::Autotune(AutotuneEvent::Requested))
    }
}
