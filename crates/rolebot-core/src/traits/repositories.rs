//! Repository traits (ports) - define the interface for the tracked-mapping store
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{CascadeDeleteCounts, TrackedEmoji, TrackedMessage, TrackedRole};
use crate::error::{CreateTrackedError, StoreError};
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, StoreError>;

// ============================================================================
// Tracked Message Repository
// ============================================================================

#[async_trait]
pub trait TrackedMessageRepository: Send + Sync {
    /// Create a tracked message, returning its surrogate id
    ///
    /// Fails with `AlreadyTracked` when the platform message is already tracked.
    async fn create(
        &self,
        platform_message_id: Snowflake,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<i32>;

    /// Create a tracked message together with its emoji/role pairs
    ///
    /// Pair `i` is stored at position `i`. Either every row is stored or none
    /// is, so readers never see the message without its full mapping.
    async fn create_with_pairs(
        &self,
        platform_message_id: Snowflake,
        guild_id: Snowflake,
        channel_id: Snowflake,
        pairs: &[(&str, &str)],
    ) -> Result<i32, CreateTrackedError>;

    /// Add an emoji row at `position`
    ///
    /// Fails with `DuplicatePosition` when the position is taken.
    async fn add_emoji(&self, tracked_message_id: i32, position: i32, emoji: &str)
        -> RepoResult<i32>;

    /// Add a role row at `position`
    async fn add_role(&self, tracked_message_id: i32, position: i32, role: &str) -> RepoResult<i32>;

    /// Emoji rows ordered by position, then id
    async fn list_emojis(&self, tracked_message_id: i32) -> RepoResult<Vec<TrackedEmoji>>;

    /// Role rows ordered by position, then id
    async fn list_roles(&self, tracked_message_id: i32) -> RepoResult<Vec<TrackedRole>>;

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<TrackedMessage>>;

    async fn find_by_platform_ids(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        platform_message_id: Snowflake,
    ) -> RepoResult<Option<TrackedMessage>>;

    /// Every tracked message, in id order
    async fn list_all(&self) -> RepoResult<Vec<TrackedMessage>>;

    /// Delete all emoji rows of a tracked message, returning how many went
    async fn delete_emojis(&self, tracked_message_id: i32) -> RepoResult<u64>;

    /// Delete all role rows of a tracked message, returning how many went
    async fn delete_roles(&self, tracked_message_id: i32) -> RepoResult<u64>;

    /// Delete the tracked message row itself
    async fn delete_message(&self, tracked_message_id: i32) -> RepoResult<u64>;

    /// Delete emoji rows, then role rows, then the message row
    ///
    /// Deleting an absent id yields zero counts.
    async fn cascade_delete(&self, tracked_message_id: i32) -> RepoResult<CascadeDeleteCounts> {
        let deleted_emojis = self.delete_emojis(tracked_message_id).await?;
        let deleted_roles = self.delete_roles(tracked_message_id).await?;
        let deleted_messages = self.delete_message(tracked_message_id).await?;
        Ok(CascadeDeleteCounts {
            deleted_emojis,
            deleted_roles,
            deleted_messages,
        })
    }
}

// ============================================================================
// Schema Repository
// ============================================================================

/// Schema lifecycle, used once at startup
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// All three tables exist
    async fn has_schema(&self) -> RepoResult<bool>;

    /// Drop then create every table
    async fn ensure_schema(&self) -> RepoResult<()>;

    async fn drop_schema(&self) -> RepoResult<()>;
}
