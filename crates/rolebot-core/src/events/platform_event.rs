//! Platform events - inbound notifications the bot reacts to
//!
//! Wire decoding happens at the gateway; these are the resolved shapes the
//! engine consumes.

use crate::entities::{Member, User};
use crate::value_objects::{Emoji, Snowflake};

#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// Connection established; carries nothing the engine needs
    Ready,
    ReactionAdd(ReactionEvent),
    ReactionRemove(ReactionEvent),
    MessageDelete(MessageDeleteEvent),
    MessageCreate(MessageCreateEvent),
}

impl PlatformEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::ReactionAdd(_) => "MESSAGE_REACTION_ADD",
            Self::ReactionRemove(_) => "MESSAGE_REACTION_REMOVE",
            Self::MessageDelete(_) => "MESSAGE_DELETE",
            Self::MessageCreate(_) => "MESSAGE_CREATE",
        }
    }

    /// Platform message this event concerns, if any
    pub fn message_id(&self) -> Option<Snowflake> {
        match self {
            Self::Ready => None,
            Self::ReactionAdd(e) | Self::ReactionRemove(e) => Some(e.message_id),
            Self::MessageDelete(e) => Some(e.id),
            Self::MessageCreate(e) => Some(e.id),
        }
    }
}

/// Direction of a reaction event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionAction {
    Add,
    Remove,
}

impl ReactionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// A user added or removed a reaction
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub action: ReactionAction,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    /// `None` for DMs, or when the payload left it out
    pub guild_id: Option<Snowflake>,
    pub emoji: Emoji,
    /// Member data embedded in the payload, when present
    pub member: Option<Member>,
}

impl ReactionEvent {
    /// Payload came without member data and must be completed by fetching
    pub fn is_partial(&self) -> bool {
        self.member.is_none()
    }
}

/// A message was deleted
#[derive(Debug, Clone)]
pub struct MessageDeleteEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
}

/// A message was posted; used for command intake
#[derive(Debug, Clone)]
pub struct MessageCreateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author: User,
    pub content: String,
}
