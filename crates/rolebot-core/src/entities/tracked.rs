//! Tracked-mapping records - the stored declaration of which emoji grants
//! which role on which message

use crate::value_objects::Snowflake;

/// A platform message under reaction-role management
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMessage {
    /// Store-assigned surrogate key
    pub id: i32,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    /// Unique across all tracked messages
    pub platform_message_id: Snowflake,
}

/// One emoji of a tracked message, paired with the role at the same position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEmoji {
    pub id: i32,
    pub tracked_message_id: i32,
    pub position: i32,
    /// Raw emoji token as typed by the operator
    pub emoji: String,
}

/// One role of a tracked message, stored as a role mention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRole {
    pub id: i32,
    pub tracked_message_id: i32,
    pub position: i32,
    pub role: String,
}

/// Rows removed by a cascade delete, per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeDeleteCounts {
    pub deleted_emojis: u64,
    pub deleted_roles: u64,
    pub deleted_messages: u64,
}

impl CascadeDeleteCounts {
    /// Nothing was there to delete
    pub fn is_empty(&self) -> bool {
        self.deleted_emojis == 0 && self.deleted_roles == 0 && self.deleted_messages == 0
    }
}
