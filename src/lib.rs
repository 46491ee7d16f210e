//! # gaze-control
//!
//! Remote-control channel of an eye-gaze tracker.
//!
//! External programs connect over raw TCP or WebSocket and send one-line
//! text commands (`CalibrationStart`, `CalibrationAreaSize 1280 1024`,
//! `LogWriteLine trial 3 begins`, ...). Commands are parsed, routed to the
//! subsystem that owns them, and marshaled onto the single processing
//! context that owns all tracker state. Replies and echoes flow back as
//! status lines; every state change is also published as a JSON
//! notification.
//!
//! ## Architecture
//!
//! ```text
//! Clients (TCP lines, WebSocket /ws)
//!     │
//!     ├── Transport (transport/)          one task per connection
//!     ├── parse_line (protocol/)
//!     ├── CommandRouter (router/)         keyword → handler
//!     ├── Subsystems (subsystem/)         raise TrackerEvent
//!     │
//!     ├── Marshaling queue (marshal/)     FIFO, unbounded
//!     │
//!     └── TrackerContext (context/)       dedicated thread
//!           ├── CalibrationSession, SessionLog, window state
//!           ├── TrackerFacade / SettingsStore
//!           ├── outbox ──► ClientRegistry fan-out ──► clients
//!           └── EventBus ──► /events observers
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod marshal;
pub mod protocol;
pub mod router;
pub mod subsystem;
pub mod transport;
