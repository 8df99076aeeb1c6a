//! Tracked-mapping database models

use sqlx::FromRow;

/// Database model for role_react_message table
#[derive(Debug, Clone, FromRow)]
pub struct TrackedMessageModel {
    pub id: i32,
    pub discord_guild_id: i64,
    pub discord_channel_id: i64,
    pub discord_message_id: i64,
}

/// Database model for role_react_message_emoji table
#[derive(Debug, Clone, FromRow)]
pub struct TrackedEmojiModel {
    pub id: i32,
    pub role_react_message_id: i32,
    pub position: i32,
    pub emoji: String,
}

/// Database model for role_react_message_role table
#[derive(Debug, Clone, FromRow)]
pub struct TrackedRoleModel {
    pub id: i32,
    pub role_react_message_id: i32,
    pub position: i32,
    pub role: String,
}
