//! Control-channel error types.
//!
//! [`ControlError`] is the central error type of the crate. None of its
//! variants is ever allowed to escape the command router: they are logged
//! at the boundary where they occur and the offending command or connection
//! is dropped.

use std::num::ParseIntError;

use crate::context::CalibrationState;

/// Error raised anywhere along the command path.
///
/// # Error Codes
///
/// | Range     | Category          |
/// |-----------|-------------------|
/// | 1000–1999 | Protocol / input  |
/// | 2000–2999 | State machine     |
/// | 3000–3999 | Runtime / I/O     |
/// | 4000–4999 | Configuration     |
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// A numeric command parameter failed strict integer parsing.
    #[error("{keyword}: invalid {name} parameter {value:?}: {source}")]
    InvalidParameter {
        /// Keyword of the command that carried the parameter.
        keyword: String,
        /// Logical name of the parameter (e.g. `width`).
        name: &'static str,
        /// Raw token as received on the wire.
        value: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// A calibration operation was requested from a state that does not
    /// allow it. The request is ignored.
    #[error("calibration {operation} ignored in state {state}")]
    InvalidTransition {
        /// Operation that was attempted (`start`, `accept`, ...).
        operation: &'static str,
        /// State the session was in.
        state: CalibrationState,
    },

    /// The processing context stopped consuming the marshaling queue.
    #[error("processing context is no longer accepting work")]
    QueueClosed,

    /// Socket or log-file failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value could not be parsed.
    #[error("invalid configuration value for {key}: {value:?}")]
    InvalidConfig {
        /// Environment variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

impl ControlError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::InvalidParameter { .. } => 1001,
            Self::InvalidTransition { .. } => 2001,
            Self::QueueClosed => 3001,
            Self::Io(_) => 3002,
            Self::InvalidConfig { .. } => 4001,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_keyword_and_value() {
        let Err(source) = "abc".parse::<i32>() else {
            panic!("expected parse failure");
        };
        let err = ControlError::InvalidParameter {
            keyword: "CalibrationAreaSize".to_string(),
            name: "width",
            value: "abc".to_string(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("CalibrationAreaSize"));
        assert!(msg.contains("\"abc\""));
        assert_eq!(err.code(), 1001);
    }

    #[test]
    fn invalid_transition_mentions_state() {
        let err = ControlError::InvalidTransition {
            operation: "accept",
            state: CalibrationState::Idle,
        };
        assert_eq!(err.to_string(), "calibration accept ignored in state idle");
        assert_eq!(err.code(), 2001);
    }

    #[test]
    fn io_errors_convert() {
        let err: ControlError = std::io::Error::other("boom").into();
        assert_eq!(err.code(), 3002);
    }
}
