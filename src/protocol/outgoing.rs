//! Server → client status lines.

use crate::domain::ClientId;

use super::Keyword;

/// Which connected clients an outgoing line is meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every connected client.
    All,
    /// A single client (typically the one that asked).
    Client(ClientId),
    /// An explicit set of clients.
    Clients(Vec<ClientId>),
}

impl Audience {
    /// Returns `true` if the line should be delivered to `client`.
    #[must_use]
    pub fn includes(&self, client: ClientId) -> bool {
        match self {
            Self::All => true,
            Self::Client(id) => *id == client,
            Self::Clients(ids) => ids.contains(&client),
        }
    }
}

/// One outgoing protocol line plus its intended audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Who receives the line.
    pub audience: Audience,
    /// Line keyword.
    pub keyword: Keyword,
    /// Free-form value appended after the keyword. May be empty.
    pub value: String,
}

impl OutgoingMessage {
    /// Creates a message addressed to every client.
    #[must_use]
    pub fn broadcast(keyword: Keyword, value: impl Into<String>) -> Self {
        Self {
            audience: Audience::All,
            keyword,
            value: value.into(),
        }
    }

    /// Creates a message addressed to a single client.
    #[must_use]
    pub fn to_client(client: ClientId, keyword: Keyword, value: impl Into<String>) -> Self {
        Self {
            audience: Audience::Client(client),
            keyword,
            value: value.into(),
        }
    }

    /// Renders the wire line, without terminator.
    #[must_use]
    pub fn to_line(&self) -> String {
        if self.value.is_empty() {
            self.keyword.as_str().to_string()
        } else {
            format!("{} {}", self.keyword, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_joins_keyword_and_value() {
        let msg = OutgoingMessage::broadcast(Keyword::CalibrationQuality, "4");
        assert_eq!(msg.to_line(), "CalibrationQuality 4");
    }

    #[test]
    fn empty_value_renders_keyword_only() {
        let msg = OutgoingMessage::broadcast(Keyword::LogPathGet, "");
        assert_eq!(msg.to_line(), "LogPathGet");
    }

    #[test]
    fn audience_filters() {
        let a = ClientId::new();
        let b = ClientId::new();
        let c = ClientId::new();

        assert!(Audience::All.includes(a));
        assert!(Audience::Client(a).includes(a));
        assert!(!Audience::Client(a).includes(b));

        let some = Audience::Clients(vec![a, b]);
        assert!(some.includes(b));
        assert!(!some.includes(c));
    }
}
