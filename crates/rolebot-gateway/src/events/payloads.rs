//! Wire payloads of the consumed events

use rolebot_core::Snowflake;
use serde::Deserialize;

/// User data included in events
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

/// Member data embedded in reaction-add payloads
#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    #[serde(default, alias = "nickname")]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// Emoji as an object `{id, name, animated}` or as a raw token
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EmojiPayload {
    Object {
        #[serde(default)]
        id: Option<Snowflake>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        animated: bool,
    },
    Token(String),
}

/// MESSAGE_REACTION_ADD / MESSAGE_REACTION_REMOVE payload
#[derive(Debug, Clone, Deserialize)]
pub struct MessageReactionPayload {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub emoji: EmojiPayload,
    #[serde(default)]
    pub member: Option<MemberPayload>,
}

/// MESSAGE_DELETE payload
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDeletePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// MESSAGE_CREATE payload
#[derive(Debug, Clone, Deserialize)]
pub struct MessageCreatePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default)]
    pub content: String,
}
