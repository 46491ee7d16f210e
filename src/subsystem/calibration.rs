//! Calibration command group.
//!
//! Operations only raise [`CalibrationEvent`]s; the calibration session
//! itself lives in the processing context, which applies the state rules
//! when the event is executed.

use crate::context::PointFeedback;
use crate::domain::Origin;
use crate::error::ControlError;
use crate::marshal::MarshalSender;

use super::TrackerEvent;

/// Events raised by [`CalibrationCommands`].
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationEvent {
    /// Begin a new attempt, or restart a running one.
    Start,
    /// The calibration presenter is up; the started attempt begins running.
    Running,
    /// Abort the current attempt.
    Abort,
    /// Accept the current attempt.
    Accept,
    /// Replace the opaque parameter blob.
    Parameters(String),
    /// Replace the calibration area geometry.
    AreaSize {
        /// Width in pixels, unchecked.
        width: i32,
        /// Height in pixels, unchecked.
        height: i32,
    },
    /// One feedback sample from the tracker feed.
    PointFeedback(PointFeedback),
    /// Quality rating computed by the tracker for the attempt.
    Result {
        /// Rating value.
        rating: i32,
    },
    /// Select the recalibration method.
    UpdateMethod(i32),
}

/// Handle for raising calibration events.
#[derive(Debug, Clone)]
pub struct CalibrationCommands {
    sink: MarshalSender,
}

impl CalibrationCommands {
    /// Creates the group on top of the marshaling queue.
    #[must_use]
    pub fn new(sink: MarshalSender) -> Self {
        Self { sink }
    }

    fn raise(&self, origin: Origin, event: CalibrationEvent) -> Result<(), ControlError> {
        self.sink.enqueue(origin, TrackerEvent::Calibration(event))
    }

    /// Requests a calibration start (or restart while running).
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn start(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::Start)
    }

    /// Reports that the calibration presenter is showing targets. Raised by
    /// the tracker side, never by a wire command.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn running(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::Running)
    }

    /// Requests an abort of the current attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn abort(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::Abort)
    }

    /// Requests acceptance of the current attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn accept(&self, origin: Origin) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::Accept)
    }

    /// Stores an opaque parameter string. The blob is not interpreted here.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn parameters(&self, origin: Origin, blob: &str) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::Parameters(blob.to_string()))
    }

    /// Sets the calibration area. No positivity check is made; consumers
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn area_size(&self, origin: Origin, width: i32, height: i32) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::AreaSize { width, height })
    }

    /// Feeds one point sample into the running session.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn point_feedback(&self, origin: Origin, point: PointFeedback) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::PointFeedback(point))
    }

    /// Reports the quality rating of the current attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn result(&self, origin: Origin, rating: i32) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::Result { rating })
    }

    /// Selects the recalibration method.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the processing context is gone.
    pub fn update_method(&self, origin: Origin, method: i32) -> Result<(), ControlError> {
        self.raise(origin, CalibrationEvent::UpdateMethod(method))
    }
}
