//! Text control protocol: line parsing, keywords, outgoing lines.
//!
//! One command per line of at most [`MAX_LINE_BYTES`], tokens separated by a
//! single space, at most [`MAX_TOKENS`] tokens per line. Outgoing status lines share the same
//! `<Keyword> <value>` shape.

pub mod command;
pub mod keyword;
pub mod outgoing;

pub use command::{Command, MAX_LINE_BYTES, MAX_PARAMS, MAX_TOKENS, parse_line};
pub use keyword::Keyword;
pub use outgoing::{Audience, OutgoingMessage};
