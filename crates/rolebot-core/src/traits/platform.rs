//! Platform port - the remote chat platform as the engine sees it
//!
//! Every call is fallible. Lookups return `Ok(None)` when the object doesn't
//! exist (or is no longer visible to the bot); that is an expected outcome,
//! not an error.

use async_trait::async_trait;

use crate::entities::{Channel, CustomEmoji, Guild, Member, Message, Role, User};
use crate::error::PlatformError;
use crate::value_objects::{Emoji, Snowflake};

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

#[async_trait]
pub trait Platform: Send + Sync {
    // =========================================================================
    // Lookups
    // =========================================================================

    async fn fetch_guild(&self, guild_id: Snowflake) -> PlatformResult<Option<Guild>>;

    async fn fetch_channel(&self, channel_id: Snowflake) -> PlatformResult<Option<Channel>>;

    /// Message with its current reactions
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Option<Message>>;

    /// `None` when the user isn't a member of the guild
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<Option<Member>>;

    async fn fetch_user(&self, user_id: Snowflake) -> PlatformResult<Option<User>>;

    async fn fetch_role(&self, guild_id: Snowflake, role_id: Snowflake)
        -> PlatformResult<Option<Role>>;

    /// Custom emoji of the guild
    async fn fetch_emoji(
        &self,
        guild_id: Snowflake,
        emoji_id: Snowflake,
    ) -> PlatformResult<Option<CustomEmoji>>;

    /// Every user who reacted to the message with `emoji`
    async fn list_reaction_users(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
    ) -> PlatformResult<Vec<User>>;

    // =========================================================================
    // Mutations
    // =========================================================================

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<Message>;

    /// Deleting an already-deleted message succeeds
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake)
        -> PlatformResult<()>;

    /// Remove the whole reaction (every user) for `emoji`
    async fn remove_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
    ) -> PlatformResult<()>;

    /// Remove one user's reaction for `emoji`
    async fn remove_user_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
        user_id: Snowflake,
    ) -> PlatformResult<()>;

    /// Grant a role; granting a held role is a no-op on the platform
    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;

    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;
}
