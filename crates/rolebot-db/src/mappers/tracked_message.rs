//! Tracked-mapping entity <-> model mappers

use rolebot_core::entities::{TrackedEmoji, TrackedMessage, TrackedRole};
use rolebot_core::value_objects::Snowflake;

use crate::models::{TrackedEmojiModel, TrackedMessageModel, TrackedRoleModel};

impl From<TrackedMessageModel> for TrackedMessage {
    fn from(model: TrackedMessageModel) -> Self {
        TrackedMessage {
            id: model.id,
            guild_id: Snowflake::new(model.discord_guild_id),
            channel_id: Snowflake::new(model.discord_channel_id),
            platform_message_id: Snowflake::new(model.discord_message_id),
        }
    }
}

impl From<TrackedEmojiModel> for TrackedEmoji {
    fn from(model: TrackedEmojiModel) -> Self {
        TrackedEmoji {
            id: model.id,
            tracked_message_id: model.role_react_message_id,
            position: model.position,
            emoji: model.emoji,
        }
    }
}

impl From<TrackedRoleModel> for TrackedRole {
    fn from(model: TrackedRoleModel) -> Self {
        TrackedRole {
            id: model.id,
            tracked_message_id: model.role_react_message_id,
            position: model.position,
            role: model.role,
        }
    }
}
