//! Remote window-state control.

use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`WindowCommands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Minimize the main and settings windows.
    Minimize,
    /// Restore the main and settings windows.
    Restore,
    /// Make the settings window visible.
    ShowSettings,
}

/// Window-state triggers.
#[derive(Debug, Clone)]
pub struct WindowCommands {
    sink: MarshalSender,
}

impl WindowCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    fn raise(&self, origin: Origin, event: WindowEvent) -> Result<(), ControlError> {
        self.sink.enqueue(origin, TrackerEvent::Window(event))
    }

    /// Minimizes the tracker windows.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn minimize(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, WindowEvent::Minimize)
    }

    /// Restores the tracker windows.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn restore(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, WindowEvent::Restore)
    }

    /// Shows the settings window.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn show_settings(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, WindowEvent::ShowSettings)
    }
}
