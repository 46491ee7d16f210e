//! The command router: single entry point for protocol lines.
//!
//! [`CommandRouter::dispatch`] contains every protocol-level failure. An
//! unknown keyword is ignored, a malformed parameter is logged and the
//! command dropped; nothing propagates to the calling connection task.

use std::sync::Arc;

use crate::domain::{ClientId, Origin};
use crate::error::ControlError;
use crate::protocol::{Command, parse_line};
use crate::subsystem::Subsystems;

use super::CommandRegistry;

/// What happened to one dispatched line.
#[derive(Debug)]
pub enum Dispatch {
    /// The matching subsystem operation ran and raised its event.
    Executed,
    /// The keyword is not part of the protocol; nothing happened.
    Ignored,
    /// The line was blank.
    Empty,
    /// The command was dropped; the error has already been logged.
    Rejected(ControlError),
}

impl Dispatch {
    /// Returns `true` if a subsystem operation ran.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}

/// Looks commands up in the registry and invokes the subsystem operation.
///
/// Stateless apart from its immutable registry: each command is handled
/// exactly once, synchronously, with no retry.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    registry: Arc<CommandRegistry>,
    subsystems: Subsystems,
}

impl CommandRouter {
    /// Creates a router over `registry` and `subsystems`.
    #[must_use]
    pub fn new(registry: Arc<CommandRegistry>, subsystems: Subsystems) -> Self {
        Self {
            registry,
            subsystems,
        }
    }

    /// The command groups this router drives. Local producers (keyboard,
    /// tracker feed) call them directly.
    #[must_use]
    pub fn subsystems(&self) -> &Subsystems {
        &self.subsystems
    }

    /// Dispatches one parsed command.
    pub fn dispatch(&self, origin: Origin, command: &Command) -> Dispatch {
        let Some(handler) = self.registry.get(command.keyword()) else {
            tracing::trace!(%origin, keyword = command.keyword(), "unknown keyword ignored");
            return Dispatch::Ignored;
        };

        match handler(&self.subsystems, origin, command) {
            Ok(()) => {
                tracing::debug!(%origin, keyword = command.keyword(), "command dispatched");
                Dispatch::Executed
            }
            Err(err) => {
                tracing::warn!(
                    %origin,
                    keyword = command.keyword(),
                    code = err.code(),
                    error = %err,
                    "command dropped"
                );
                Dispatch::Rejected(err)
            }
        }
    }

    /// Parses and dispatches one raw protocol line.
    pub fn dispatch_line(&self, origin: Origin, line: &str) -> Dispatch {
        match parse_line(line) {
            Some(command) => self.dispatch(origin, &command),
            None => Dispatch::Empty,
        }
    }

    /// Tells the processing context a client connected.
    pub fn connection_opened(&self, client: ClientId, peer: &str) {
        if let Err(err) = self.subsystems.connection.opened(client, peer) {
            tracing::warn!(%client, error = %err, "connection open not reported");
        }
    }

    /// Tells the processing context a client went away.
    pub fn connection_closed(&self, client: ClientId, reason: &str) {
        if let Err(err) = self.subsystems.connection.closed(client, reason) {
            tracing::debug!(%client, error = %err, "connection close not reported");
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::marshal::{self, MarshalReceiver};
    use crate::subsystem::{CalibrationEvent, LogEvent, TrackerEvent};

    fn router() -> (CommandRouter, MarshalReceiver) {
        let (tx, rx) = marshal::channel();
        let router = CommandRouter::new(
            Arc::new(CommandRegistry::standard()),
            Subsystems::new(&tx),
        );
        (router, rx)
    }

    fn events(rx: &mut MarshalReceiver) -> Vec<TrackerEvent> {
        rx.drain(0).into_iter().map(|item| item.event).collect()
    }

    #[test]
    fn area_size_parses_both_params() {
        let (router, mut rx) = router();
        assert!(router
            .dispatch_line(Origin::Local, "CalibrationAreaSize 800 600")
            .is_executed());
        assert_eq!(
            events(&mut rx),
            vec![TrackerEvent::Calibration(CalibrationEvent::AreaSize {
                width: 800,
                height: 600
            })]
        );
    }

    #[test]
    fn malformed_integer_is_rejected_without_event() {
        let (router, mut rx) = router();
        let outcome = router.dispatch_line(Origin::Local, "CalibrationAreaSize wide 600");
        let Dispatch::Rejected(ControlError::InvalidParameter { name, value, .. }) = &outcome else {
            panic!("expected a rejected dispatch, got {outcome:?}");
        };
        assert_eq!(*name, "width");
        assert_eq!(value.as_str(), "wide");
        assert!(events(&mut rx).is_empty());
    }

    #[test]
    fn missing_integer_param_is_rejected() {
        let (router, mut rx) = router();
        let outcome = router.dispatch_line(Origin::Local, "CalibrationAreaSize 800");
        assert!(matches!(outcome, Dispatch::Rejected(_)));
        assert!(events(&mut rx).is_empty());
    }

    #[test]
    fn missing_text_params_read_as_empty() {
        let (router, mut rx) = router();
        assert!(router.dispatch_line(Origin::Local, "CalibrationParameters").is_executed());
        assert!(router.dispatch_line(Origin::Local, "LogPathSet").is_executed());
        assert_eq!(
            events(&mut rx),
            vec![
                TrackerEvent::Calibration(CalibrationEvent::Parameters(String::new())),
                TrackerEvent::Log(LogEvent::PathSet(String::new())),
            ]
        );
    }

    #[test]
    fn unknown_keyword_is_ignored() {
        let (router, mut rx) = router();
        assert!(matches!(
            router.dispatch_line(Origin::Local, "FooBar 1 2"),
            Dispatch::Ignored
        ));
        assert!(events(&mut rx).is_empty());
    }

    #[test]
    fn blank_line_is_empty() {
        let (router, mut rx) = router();
        assert!(matches!(router.dispatch_line(Origin::Local, ""), Dispatch::Empty));
        assert!(events(&mut rx).is_empty());
    }

    #[test]
    fn write_line_keeps_spaces() {
        let (router, mut rx) = router();
        let _ = router.dispatch_line(Origin::Local, "LogWriteLine trial 3 begins");
        assert_eq!(
            events(&mut rx),
            vec![TrackerEvent::Log(LogEvent::WriteLine("trial 3 begins".to_string()))]
        );
    }

    #[test]
    fn single_token_commands_keep_only_the_first_token() {
        let (router, mut rx) = router();
        let _ = router.dispatch_line(Origin::Local, "CalibrationParameters a b");
        let _ = router.dispatch_line(Origin::Local, "LogPathSet /tmp/gaze session.txt");
        assert_eq!(
            events(&mut rx),
            vec![
                TrackerEvent::Calibration(CalibrationEvent::Parameters("a".to_string())),
                TrackerEvent::Log(LogEvent::PathSet("/tmp/gaze".to_string())),
            ]
        );
    }

    #[test]
    fn closed_queue_is_contained() {
        let (router, rx) = router();
        drop(rx);
        let outcome = router.dispatch_line(Origin::Local, "CalibrationStart");
        assert!(matches!(outcome, Dispatch::Rejected(ControlError::QueueClosed)));
        router.connection_closed(ClientId::new(), "test");
    }

    #[test]
    fn origin_travels_with_the_event() {
        let (router, mut rx) = router();
        let client = ClientId::new();
        let _ = router.dispatch_line(Origin::Client(client), "LogPathGet");
        let items = rx.drain(0);
        assert_eq!(items.first().map(|i| i.origin), Some(Origin::Client(client)));
    }
}
