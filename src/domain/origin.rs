//! Where a unit of marshaled work came from.

use std::fmt;

use serde::Serialize;

use super::ClientId;

/// Source of a command or feed event.
///
/// Replies such as `LogPathGet` are addressed back to the originating
/// client; work raised inside the tracker process is [`Origin::Local`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "client", rename_all = "snake_case")]
pub enum Origin {
    /// A network client.
    Client(ClientId),
    /// The tracker process itself (keyboard, tracker feed, start-up).
    Local,
}

impl Origin {
    /// Returns the client id for network-originated work.
    #[must_use]
    pub const fn client(&self) -> Option<ClientId> {
        match self {
            Self::Client(id) => Some(*id),
            Self::Local => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(id) => write!(f, "client:{id}"),
            Self::Local => f.write_str("local"),
        }
    }
}

impl From<ClientId> for Origin {
    fn from(id: ClientId) -> Self {
        Self::Client(id)
    }
}
