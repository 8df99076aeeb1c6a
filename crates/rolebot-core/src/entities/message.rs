//! Message entity - a platform message with its currently-known reactions

use crate::value_objects::{Emoji, Snowflake};

/// One reaction bucket on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReaction {
    pub emoji: Emoji,
    pub count: u32,
    /// Whether the bot itself reacted
    pub me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub content: String,
    pub reactions: Vec<MessageReaction>,
}

impl Message {
    pub fn new(id: Snowflake, channel_id: Snowflake, content: impl Into<String>) -> Self {
        Self {
            id,
            channel_id,
            guild_id: None,
            content: content.into(),
            reactions: Vec::new(),
        }
    }
}
