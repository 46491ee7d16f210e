//! Calibration session and its state machine.
//!
//! ```text
//! {Idle, Ended} --start--> Started --run--> Running
//! Running --point--> Running
//! Running --accept--> Accepted --auto--> Ended
//! {Started, Running} --abort--> Aborted --auto--> Ended
//! Running --start--> Started            (restart, points cleared)
//! ```
//!
//! Every transition method returns the states entered, in order, so the
//! caller can announce each of them. Requests that do not fit the current
//! state return [`ControlError::InvalidTransition`] and leave the session
//! untouched.

use std::fmt;

use serde::Serialize;

use crate::error::ControlError;

/// Lifecycle state of one calibration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationState {
    /// No attempt has been made yet.
    #[default]
    Idle,
    /// An attempt was requested; the calibration presenter is coming up.
    Started,
    /// Points are being collected.
    Running,
    /// The attempt was accepted (transient).
    Accepted,
    /// The attempt was aborted (transient).
    Aborted,
    /// The attempt is over.
    Ended,
}

impl CalibrationState {
    /// Lower-case state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Started => "started",
            Self::Running => "running",
            Self::Accepted => "accepted",
            Self::Aborted => "aborted",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate.
    pub x: i32,
    /// Vertical pixel coordinate.
    pub y: i32,
}

impl ScreenPoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One feedback sample reported while a calibration runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointFeedback {
    /// Sample time on the feed's clock.
    pub timestamp: i64,
    /// Packet sequence number on the feed.
    pub packet_number: i32,
    /// Where the target was drawn.
    pub target: ScreenPoint,
    /// Where the gaze was estimated.
    pub gaze: ScreenPoint,
    /// Distance between target and gaze.
    pub distance: f32,
    /// Time it took to acquire the sample.
    pub acquisition_time_ms: i32,
}

impl PointFeedback {
    /// Renders the sample as a space separated log record, prefixed by
    /// `recorded_at_ms`.
    #[must_use]
    pub fn to_log_line(&self, recorded_at_ms: i64) -> String {
        format!(
            "{recorded_at_ms} {} {} {} {} {} {} {} {}",
            self.timestamp,
            self.packet_number,
            self.target.x,
            self.target.y,
            self.gaze.x,
            self.gaze.y,
            self.distance,
            self.acquisition_time_ms,
        )
    }
}

/// The stateful record of calibration attempts.
///
/// Geometry, parameters and recalibration method survive across attempts;
/// points and quality belong to the current attempt only.
#[derive(Debug, Clone, Default)]
pub struct CalibrationSession {
    state: CalibrationState,
    attempt: u64,
    area_width: i32,
    area_height: i32,
    parameters: String,
    points: Vec<PointFeedback>,
    quality: Option<i32>,
    update_method: i32,
}

impl CalibrationSession {
    /// Creates an idle session with the given geometry and parameters.
    #[must_use]
    pub fn new(area_width: i32, area_height: i32, parameters: impl Into<String>) -> Self {
        Self {
            area_width,
            area_height,
            parameters: parameters.into(),
            ..Self::default()
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CalibrationState {
        self.state
    }

    /// Number of attempts started so far (restarts included).
    #[must_use]
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Calibration area width.
    #[must_use]
    pub const fn area_width(&self) -> i32 {
        self.area_width
    }

    /// Calibration area height.
    #[must_use]
    pub const fn area_height(&self) -> i32 {
        self.area_height
    }

    /// Opaque parameter blob.
    #[must_use]
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Points recorded in the current attempt, oldest first.
    #[must_use]
    pub fn points(&self) -> &[PointFeedback] {
        &self.points
    }

    /// Quality rating reported for the current attempt, if any.
    #[must_use]
    pub const fn quality(&self) -> Option<i32> {
        self.quality
    }

    /// Selected recalibration method.
    #[must_use]
    pub const fn update_method(&self) -> i32 {
        self.update_method
    }

    /// Begins a new attempt from `Idle` or `Ended`, or restarts a running
    /// one. Points and quality are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidTransition`] from any other state.
    pub fn start(&mut self) -> Result<Vec<CalibrationState>, ControlError> {
        match self.state {
            CalibrationState::Idle | CalibrationState::Ended | CalibrationState::Running => {
                self.points.clear();
                self.quality = None;
                self.attempt = self.attempt.saturating_add(1);
                self.state = CalibrationState::Started;
                Ok(vec![CalibrationState::Started])
            }
            state => Err(rejected("start", state)),
        }
    }

    /// Internal step once the calibration presenter is up.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidTransition`] unless `Started`.
    pub fn run(&mut self) -> Result<Vec<CalibrationState>, ControlError> {
        match self.state {
            CalibrationState::Started => {
                self.state = CalibrationState::Running;
                Ok(vec![CalibrationState::Running])
            }
            state => Err(rejected("run", state)),
        }
    }

    /// Accepts the running attempt; ends in `Ended`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidTransition`] unless `Running`.
    pub fn accept(&mut self) -> Result<Vec<CalibrationState>, ControlError> {
        match self.state {
            CalibrationState::Running => {
                self.state = CalibrationState::Ended;
                Ok(vec![CalibrationState::Accepted, CalibrationState::Ended])
            }
            state => Err(rejected("accept", state)),
        }
    }

    /// Aborts the current attempt; ends in `Ended`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidTransition`] unless `Started` or
    /// `Running`.
    pub fn abort(&mut self) -> Result<Vec<CalibrationState>, ControlError> {
        match self.state {
            CalibrationState::Started | CalibrationState::Running => {
                self.state = CalibrationState::Ended;
                Ok(vec![CalibrationState::Aborted, CalibrationState::Ended])
            }
            state => Err(rejected("abort", state)),
        }
    }

    /// Appends a feedback point. Returns the point count after the append.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidTransition`] unless `Running`.
    pub fn record_point(&mut self, point: PointFeedback) -> Result<usize, ControlError> {
        if self.state != CalibrationState::Running {
            return Err(rejected("record point", self.state));
        }
        self.points.push(point);
        Ok(self.points.len())
    }

    /// Overwrites the calibration area. Values are stored as given.
    pub fn set_area_size(&mut self, width: i32, height: i32) {
        self.area_width = width;
        self.area_height = height;
    }

    /// Overwrites the parameter blob.
    pub fn set_parameters(&mut self, blob: &str) {
        blob.clone_into(&mut self.parameters);
    }

    /// Records the quality rating of the current attempt.
    pub fn set_quality(&mut self, rating: i32) {
        self.quality = Some(rating);
    }

    /// Selects the recalibration method.
    pub fn set_update_method(&mut self, method: i32) {
        self.update_method = method;
    }
}

fn rejected(operation: &'static str, state: CalibrationState) -> ControlError {
    ControlError::InvalidTransition { operation, state }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn point(n: i32) -> PointFeedback {
        PointFeedback {
            timestamp: 1_000 + i64::from(n),
            packet_number: n,
            target: ScreenPoint::new(100, 200),
            gaze: ScreenPoint::new(104, 197),
            distance: 5.0,
            acquisition_time_ms: 20,
        }
    }

    fn running() -> CalibrationSession {
        let mut session = CalibrationSession::new(1920, 1080, "");
        assert!(session.start().is_ok());
        assert!(session.run().is_ok());
        session
    }

    #[test]
    fn start_from_idle_enters_started() {
        let mut session = CalibrationSession::default();
        let Ok(entered) = session.start() else {
            panic!("start from idle must succeed");
        };
        assert_eq!(entered, vec![CalibrationState::Started]);
        assert_eq!(session.state(), CalibrationState::Started);
        assert_eq!(session.attempt(), 1);
    }

    #[test]
    fn run_moves_started_to_running() {
        let session = running();
        assert_eq!(session.state(), CalibrationState::Running);
    }

    #[test]
    fn restart_while_running_clears_points() {
        let mut session = running();
        assert_eq!(session.record_point(point(1)).ok(), Some(1));
        assert_eq!(session.record_point(point(2)).ok(), Some(2));

        let Ok(entered) = session.start() else {
            panic!("restart must succeed");
        };
        assert_eq!(entered, vec![CalibrationState::Started]);
        assert_eq!(session.state(), CalibrationState::Started);
        assert!(session.points().is_empty());
        assert_eq!(session.attempt(), 2);
    }

    #[test]
    fn accept_auto_advances_to_ended() {
        let mut session = running();
        let Ok(entered) = session.accept() else {
            panic!("accept from running must succeed");
        };
        assert_eq!(
            entered,
            vec![CalibrationState::Accepted, CalibrationState::Ended]
        );
        assert_eq!(session.state(), CalibrationState::Ended);
    }

    #[test]
    fn accept_while_idle_is_rejected_without_effect() {
        let mut session = CalibrationSession::new(800, 600, "p");
        assert!(matches!(
            session.accept(),
            Err(ControlError::InvalidTransition {
                operation: "accept",
                state: CalibrationState::Idle
            })
        ));
        assert_eq!(session.state(), CalibrationState::Idle);
        assert_eq!(session.attempt(), 0);
    }

    #[test]
    fn abort_allowed_from_started_and_running() {
        let mut session = CalibrationSession::default();
        assert!(session.start().is_ok());
        assert_eq!(
            session.abort().ok(),
            Some(vec![CalibrationState::Aborted, CalibrationState::Ended])
        );

        let mut session = running();
        assert!(session.abort().is_ok());
        assert_eq!(session.state(), CalibrationState::Ended);
    }

    #[test]
    fn abort_outside_attempt_is_rejected() {
        let mut session = CalibrationSession::default();
        assert!(session.abort().is_err());

        let mut ended = running();
        assert!(ended.accept().is_ok());
        assert!(ended.abort().is_err());
        assert!(ended.accept().is_err());
        assert_eq!(ended.state(), CalibrationState::Ended);
    }

    #[test]
    fn start_after_ended_begins_new_attempt() {
        let mut session = running();
        assert!(session.record_point(point(1)).is_ok());
        session.set_quality(3);
        assert!(session.accept().is_ok());

        assert!(session.start().is_ok());
        assert_eq!(session.state(), CalibrationState::Started);
        assert!(session.points().is_empty());
        assert_eq!(session.quality(), None);
        assert_eq!(session.attempt(), 2);
    }

    #[test]
    fn start_while_started_is_rejected() {
        let mut session = CalibrationSession::default();
        assert!(session.start().is_ok());
        assert!(session.start().is_err());
        assert_eq!(session.attempt(), 1);
    }

    #[test]
    fn points_only_recorded_while_running() {
        let mut session = CalibrationSession::default();
        assert!(session.record_point(point(1)).is_err());
        assert!(session.start().is_ok());
        assert!(session.record_point(point(1)).is_err());
        assert!(session.run().is_ok());
        assert_eq!(session.record_point(point(1)).ok(), Some(1));
        assert_eq!(session.state(), CalibrationState::Running);
    }

    #[test]
    fn area_size_overwrites_without_accumulating() {
        let mut session = CalibrationSession::default();
        session.set_area_size(800, 600);
        session.set_area_size(1024, 768);
        assert_eq!((session.area_width(), session.area_height()), (1024, 768));
    }

    #[test]
    fn geometry_survives_new_attempts() {
        let mut session = CalibrationSession::new(800, 600, "a=1");
        assert!(session.start().is_ok());
        assert_eq!(session.parameters(), "a=1");
        assert_eq!(session.area_width(), 800);
    }

    #[test]
    fn log_line_lists_target_then_gaze() {
        let line = point(7).to_log_line(42);
        assert_eq!(line, "42 1007 7 100 200 104 197 5 20");
    }
}
