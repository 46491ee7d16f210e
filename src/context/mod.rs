//! The processing context: sole owner of mutable tracker state.
//!
//! [`TrackerContext`] runs on one dedicated thread. Each frame it first does
//! its own work ([`TrackerFacade::process_frame`]), then drains the
//! marshaling queue at idle priority and applies every event in FIFO order:
//! state mutation, collaborator calls, outgoing lines, notifications. No
//! other thread touches the calibration session, the session log or the
//! window state; they observe [`StatusSnapshot`] copies instead.

pub mod facade;
pub mod session;
pub mod session_log;
pub mod status;

pub use facade::{HeadlessTracker, InMemorySettings, SettingsStore, TrackerFacade, WindowState};
pub use session::{CalibrationSession, CalibrationState, PointFeedback, ScreenPoint};
pub use session_log::SessionLog;
pub use status::{CalibrationStatus, StatusSnapshot};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{mpsc, watch};

use crate::domain::{ControlEvent, EventBus, Notification, Origin};
use crate::error::ControlError;
use crate::marshal::{MarshalReceiver, WorkItem};
use crate::protocol::{Keyword, OutgoingMessage};
use crate::subsystem::{
    AutotuneEvent, CalibrationEvent, CameraEvent, ConnectionEvent, LogEvent, SettingsEvent,
    StreamEvent, TrackerEvent, ViewerEvent, WindowEvent,
};

/// Producer side of the outgoing line fan-out.
pub type Outbox = mpsc::UnboundedSender<OutgoingMessage>;

/// Channels connecting the context to the rest of the process.
#[derive(Debug)]
pub struct ContextLinks {
    /// Marshaled work to execute.
    pub queue: MarshalReceiver,
    /// Outgoing protocol lines.
    pub outbox: Outbox,
    /// Post-change notifications.
    pub events: EventBus,
    /// Latest state copy for observers.
    pub status: watch::Sender<StatusSnapshot>,
}

/// Frame pacing of [`TrackerContext::run`].
#[derive(Debug, Clone, Copy)]
pub struct FramePacing {
    /// Target time between frame starts.
    pub frame_interval: Duration,
    /// Maximum work items executed per frame; `0` means no limit.
    pub drain_budget: usize,
}

impl Default for FramePacing {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(33),
            drain_budget: 64,
        }
    }
}

/// Single owner of the calibration session and all UI-facing state.
#[derive(Debug)]
pub struct TrackerContext<T, S> {
    session: CalibrationSession,
    log: SessionLog,
    streaming: bool,
    window: WindowState,
    settings_visible: bool,
    video_detached: bool,
    track_box_visible: bool,
    camera: Option<(i32, i32)>,
    clients: usize,
    processed: u64,
    tracker: T,
    settings: S,
    links: ContextLinks,
}

impl<T: TrackerFacade, S: SettingsStore> TrackerContext<T, S> {
    /// Creates the context. Calibration geometry and parameters are seeded
    /// from `settings`.
    #[must_use]
    pub fn new(tracker: T, settings: S, log_path: impl Into<PathBuf>, links: ContextLinks) -> Self {
        let (width, height) = settings.calibration_area();
        let session = CalibrationSession::new(width, height, settings.calibration_parameters());
        let context = Self {
            session,
            log: SessionLog::new(log_path),
            streaming: false,
            window: WindowState::Normal,
            settings_visible: false,
            video_detached: false,
            track_box_visible: false,
            camera: None,
            clients: 0,
            processed: 0,
            tracker,
            settings,
            links,
        };
        context.publish_status();
        context
    }

    /// The calibration session.
    #[must_use]
    pub fn session(&self) -> &CalibrationSession {
        &self.session
    }

    /// The session log.
    #[must_use]
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// The tracker facade.
    #[must_use]
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// The settings store.
    #[must_use]
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Builds a snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            calibration: CalibrationStatus::from(&self.session),
            streaming: self.streaming,
            logging: self.log.is_enabled(),
            log_path: self.log.path().display().to_string(),
            window: self.window,
            settings_visible: self.settings_visible,
            video_detached: self.video_detached,
            track_box_visible: self.track_box_visible,
            camera: self.camera,
            clients: self.clients,
            processed: self.processed,
            updated_at: Utc::now(),
        }
    }

    /// Executes up to `budget` queued items (`0` = all queued). Returns the
    /// number executed.
    pub fn run_idle(&mut self, budget: usize) -> usize {
        let items = self.links.queue.drain(budget);
        let count = items.len();
        for item in items {
            self.apply(item);
        }
        if count > 0 {
            self.publish_status();
        }
        count
    }

    /// Runs the frame loop on the current thread until `shutdown` is set or
    /// every producer is gone. Work still queued at that point is executed
    /// before returning, and the session log is closed.
    pub fn run(mut self, pacing: FramePacing, shutdown: &AtomicBool) {
        tracing::info!(
            frame_ms = pacing.frame_interval.as_millis(),
            budget = pacing.drain_budget,
            "processing context started"
        );

        loop {
            let frame_start = Instant::now();
            self.tracker.process_frame();
            self.run_idle(pacing.drain_budget);

            if shutdown.load(Ordering::Acquire) || self.links.queue.is_closed() {
                break;
            }
            std::thread::sleep(pacing.frame_interval.saturating_sub(frame_start.elapsed()));
        }

        self.run_idle(0);
        if let Err(err) = self.log.disable() {
            tracing::warn!(error = %err, "session log flush failed");
        }
        self.publish_status();
        tracing::info!(processed = self.processed, "processing context stopped");
    }

    /// Moves the context onto its own named thread and runs it there.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Io`] if the thread cannot be spawned.
    pub fn spawn(
        self,
        pacing: FramePacing,
        shutdown: Arc<AtomicBool>,
    ) -> Result<JoinHandle<()>, ControlError>
    where
        T: 'static,
        S: 'static,
    {
        let handle = std::thread::Builder::new()
            .name("tracker-context".to_string())
            .spawn(move || self.run(pacing, &shutdown))?;
        Ok(handle)
    }

    /// Executes one marshaled work item.
    pub fn apply(&mut self, item: WorkItem) {
        let queued = item.queued_for();
        let WorkItem { origin, event, .. } = item;
        tracing::debug!(
            %origin,
            subsystem = event.subsystem(),
            queued_us = queued.as_micros(),
            "executing marshaled event"
        );

        match event {
            TrackerEvent::Calibration(event) => self.apply_calibration(origin, event),
            TrackerEvent::Camera(event) => self.apply_camera(origin, event),
            TrackerEvent::Settings(event) => self.apply_settings(origin, event),
            TrackerEvent::Viewer(event) => self.apply_viewer(origin, event),
            TrackerEvent::Autotune(event) => self.apply_autotune(origin, event),
            TrackerEvent::Stream(event) => self.apply_stream(origin, event),
            TrackerEvent::Log(event) => self.apply_log(origin, event),
            TrackerEvent::Window(event) => self.apply_window(origin, event),
            TrackerEvent::Connection(event) => self.apply_connection(origin, event),
        }
        self.processed = self.processed.saturating_add(1);
    }

    fn apply_calibration(&mut self, origin: Origin, event: CalibrationEvent) {
        match event {
            CalibrationEvent::Start => {
                let entered = self.session.start();
                self.enter_states(origin, entered);
            }
            CalibrationEvent::Running => {
                let entered = self.session.run();
                self.enter_states(origin, entered);
            }
            CalibrationEvent::Abort => {
                let entered = self.session.abort();
                self.enter_states(origin, entered);
            }
            CalibrationEvent::Accept => {
                let entered = self.session.accept();
                self.enter_states(origin, entered);
            }
            CalibrationEvent::Parameters(blob) => {
                self.session.set_parameters(&blob);
                self.settings.set_calibration_parameters(&blob);
                self.send(OutgoingMessage::broadcast(
                    Keyword::CalibrationParameters,
                    blob.clone(),
                ));
                self.notify(
                    origin,
                    ControlEvent::CalibrationParametersChanged { parameters: blob },
                );
            }
            CalibrationEvent::AreaSize { width, height } => {
                self.session.set_area_size(width, height);
                self.settings.set_calibration_area(width, height);
                self.notify(origin, ControlEvent::CalibrationAreaChanged { width, height });
            }
            CalibrationEvent::PointFeedback(point) => {
                match self.session.record_point(point.clone()) {
                    Ok(total) => {
                        let record = point.to_log_line(Utc::now().timestamp_millis());
                        if let Err(err) = self.log.write_line(&record) {
                            tracing::warn!(error = %err, "point feedback not logged");
                        }
                        self.notify(
                            origin,
                            ControlEvent::CalibrationPointRecorded { point, total },
                        );
                    }
                    Err(err) => tracing::debug!(%origin, error = %err, "point feedback dropped"),
                }
            }
            CalibrationEvent::Result { rating } => {
                self.session.set_quality(rating);
                self.send(OutgoingMessage::broadcast(
                    Keyword::CalibrationQuality,
                    rating.to_string(),
                ));
                self.notify(origin, ControlEvent::CalibrationQuality { rating });
            }
            CalibrationEvent::UpdateMethod(method) => {
                self.session.set_update_method(method);
                self.settings.set_recalibration_method(method);
                self.notify(origin, ControlEvent::CalibrationMethodChanged { method });
            }
        }
    }

    fn enter_states(
        &mut self,
        origin: Origin,
        entered: Result<Vec<CalibrationState>, ControlError>,
    ) {
        let entered = match entered {
            Ok(entered) => entered,
            Err(err) => {
                tracing::warn!(
                    %origin,
                    code = err.code(),
                    error = %err,
                    "calibration request ignored"
                );
                return;
            }
        };
        for state in entered {
            self.tracker.calibration_changed(state, &self.session);
            self.notify(
                origin,
                ControlEvent::CalibrationStateChanged {
                    state,
                    attempt: self.session.attempt(),
                },
            );
        }
    }

    fn apply_camera(&mut self, origin: Origin, event: CameraEvent) {
        let CameraEvent::Changed { device, mode } = event;
        self.camera = Some((device, mode));
        self.settings.set_camera(device, mode);
        self.tracker.set_camera(device, mode);
        self.notify(origin, ControlEvent::CameraChanged { device, mode });
    }

    fn apply_settings(&mut self, origin: Origin, event: SettingsEvent) {
        let SettingsEvent::Opened = event;
        self.open_settings(origin);
    }

    fn open_settings(&mut self, origin: Origin) {
        self.settings_visible = true;
        self.tracker.show_settings();
        self.notify(origin, ControlEvent::SettingsOpened);
    }

    fn apply_viewer(&mut self, origin: Origin, event: ViewerEvent) {
        match event {
            ViewerEvent::VideoDetach => {
                self.video_detached = true;
                self.tracker.detach_video();
                self.notify(origin, ControlEvent::VideoDetached);
            }
            ViewerEvent::TrackBoxShow | ViewerEvent::TrackBoxHide => {
                let visible = event == ViewerEvent::TrackBoxShow;
                self.track_box_visible = visible;
                self.tracker.set_track_box_visible(visible);
                self.notify(origin, ControlEvent::TrackBoxVisibility { visible });
            }
        }
    }

    fn apply_autotune(&mut self, origin: Origin, event: AutotuneEvent) {
        let AutotuneEvent::Requested = event;
        self.tracker.autotune();
        self.notify(origin, ControlEvent::AutotuneRequested);
    }

    fn apply_stream(&mut self, origin: Origin, event: StreamEvent) {
        let enabled = event == StreamEvent::Start;
        if self.streaming == enabled {
            return;
        }
        self.streaming = enabled;
        self.tracker.set_streaming(enabled);
        self.notify(origin, ControlEvent::StreamingChanged { enabled });
    }

    fn apply_log(&mut self, origin: Origin, event: LogEvent) {
        match event {
            LogEvent::Start => match self.log.enable() {
                Ok(true) => self.notify(origin, ControlEvent::LoggingChanged { enabled: true }),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(
                        path = %self.log.path().display(),
                        error = %err,
                        "log start failed"
                    );
                }
            },
            LogEvent::Stop => match self.log.disable() {
                Ok(true) => self.notify(origin, ControlEvent::LoggingChanged { enabled: false }),
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "log stop failed"),
            },
            LogEvent::PathGet => {
                let path = self.log.path().display().to_string();
                match origin.client() {
                    Some(client) => {
                        self.send(OutgoingMessage::to_client(client, Keyword::LogPathGet, path));
                    }
                    None => tracing::info!(%path, "log path"),
                }
            }
            LogEvent::PathSet(path) => {
                if path.is_empty() {
                    tracing::warn!(%origin, "empty log path ignored");
                    return;
                }
                let was_enabled = self.log.is_enabled();
                if let Err(err) = self.log.set_path(&path) {
                    tracing::warn!(%path, error = %err, "log reopen failed");
                }
                let path = self.log.path().display().to_string();
                self.notify(origin, ControlEvent::LogPathChanged { path });
                if was_enabled && !self.log.is_enabled() {
                    self.notify(origin, ControlEvent::LoggingChanged { enabled: false });
                }
            }
            LogEvent::WriteLine(line) => {
                if let Err(err) = self.log.write_line(&line) {
                    tracing::warn!(error = %err, "log write failed");
                }
                self.send(OutgoingMessage::broadcast(Keyword::LogWriteLine, line));
            }
        }
    }

    fn apply_window(&mut self, origin: Origin, event: WindowEvent) {
        let state = match event {
            WindowEvent::Minimize => WindowState::Minimized,
            WindowEvent::Restore => WindowState::Normal,
            WindowEvent::ShowSettings => {
                self.open_settings(origin);
                return;
            }
        };
        self.window = state;
        self.tracker.set_window_state(state);
        self.notify(origin, ControlEvent::WindowStateChanged { state });
    }

    fn apply_connection(&mut self, origin: Origin, event: ConnectionEvent) {
        let Some(client) = origin.client() else {
            return;
        };
        match event {
            ConnectionEvent::Opened { peer } => {
                self.clients = self.clients.saturating_add(1);
                tracing::info!(%client, %peer, clients = self.clients, "control client connected");
                self.notify(origin, ControlEvent::ClientConnected { client, peer });
            }
            ConnectionEvent::Closed { reason } => {
                self.clients = self.clients.saturating_sub(1);
                tracing::info!(
                    %client,
                    %reason,
                    clients = self.clients,
                    "control client disconnected"
                );
                self.notify(origin, ControlEvent::ClientDisconnected { client, reason });
            }
        }
    }

    fn send(&self, message: OutgoingMessage) {
        if self.links.outbox.send(message).is_err() {
            tracing::debug!("outbox closed; outgoing line dropped");
        }
    }

    fn notify(&self, origin: Origin, event: ControlEvent) {
        let _ = self.links.events.publish(Notification::now(origin, event));
    }

    fn publish_status(&self) {
        self.links.status.send_replace(self.snapshot());
    }
}
