//! Session log command group.
//!
//! The log file itself is owned by the processing context; these operations
//! only describe what should happen to it.

use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`LogCommands`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// Open the log file and start appending.
    Start,
    /// Flush and close the log file.
    Stop,
    /// Reply with the current log path to the requester.
    PathGet,
    /// Replace the log path.
    PathSet(String),
    /// Append a line and echo it to every client.
    WriteLine(String),
}

/// Session log triggers.
#[derive(Debug, Clone)]
pub struct LogCommands {
    sink: MarshalSender,
}

impl LogCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    fn raise(&self, origin: Origin, event: LogEvent) -> Result<(), ControlError> {
        self.sink.enqueue(origin, TrackerEvent::Log(event))
    }

    /// Enables logging.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn start(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, LogEvent::Start)
    }

    /// Disables logging.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn stop(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, LogEvent::Stop)
    }

    /// Asks for the current log path; the answer goes back to `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn path_get(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, LogEvent::PathGet)
    }

    /// Sets the log path.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn path_set(&self, origin: Origin, path: &str) -> Result<(), ControlError> {
        self.raise(origin, LogEvent::PathSet(path.to_string()))
    }

    /// Appends `line` to the log.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn write_line(&self, origin: Origin, line: &str) -> Result<(), ControlError> {
        self.raise(origin, LogEvent::WriteLine(line.to_string()))
    }
}
