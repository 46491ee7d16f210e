//! Command registry and router.

pub mod dispatch;
pub mod registry;

pub use dispatch::{CommandRouter, Dispatch};
pub use registry::{CommandHandler, CommandRegistry, int_param};
