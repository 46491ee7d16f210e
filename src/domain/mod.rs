//! Domain layer: identifiers, notifications, and the event bus.
//!
//! These types are shared by the transport, the router and the processing
//! context without pulling in any of their machinery.

pub mod client_id;
pub mod control_event;
pub mod event_bus;
pub mod origin;

pub use client_id::ClientId;
pub use control_event::{ControlEvent, Notification};
pub use event_bus::EventBus;
pub use origin::Origin;
