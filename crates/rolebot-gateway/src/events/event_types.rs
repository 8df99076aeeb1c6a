//! Event types the bot consumes, by their envelope `event_type` name
//!
//! Anything else on the bus (typing, presence, channel updates...) is
//! skipped before payload decoding.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    Ready,
    /// Command intake
    MessageCreate,
    MessageDelete,
    MessageReactionAdd,
    MessageReactionRemove,
}

impl GatewayEventType {
    pub const ALL: [Self; 5] = [
        Self::Ready,
        Self::MessageCreate,
        Self::MessageDelete,
        Self::MessageReactionAdd,
        Self::MessageReactionRemove,
    ];

    /// Envelope name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageDelete => "MESSAGE_DELETE",
            Self::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
        }
    }

    /// `None` for types the bot doesn't consume
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
