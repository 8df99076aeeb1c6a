//! PostgreSQL implementation of TrackedMessageRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use rolebot_core::entities::{CascadeDeleteCounts, TrackedEmoji, TrackedMessage, TrackedRole};
use rolebot_core::error::{CreateStage, CreateTrackedError, StoreError};
use rolebot_core::traits::{RepoResult, TrackedMessageRepository};
use rolebot_core::value_objects::Snowflake;

use crate::models::{TrackedEmojiModel, TrackedMessageModel, TrackedRoleModel};

use super::error::{map_child_insert_error, map_db_error, map_unique_violation};

const INSERT_MESSAGE: &str = r#"
    INSERT INTO role_react_message (discord_guild_id, discord_channel_id, discord_message_id)
    VALUES ($1, $2, $3)
    RETURNING id
"#;

const INSERT_EMOJI: &str = r#"
    INSERT INTO role_react_message_emoji (role_react_message_id, position, emoji)
    VALUES ($1, $2, $3)
    RETURNING id
"#;

const INSERT_ROLE: &str = r#"
    INSERT INTO role_react_message_role (role_react_message_id, position, role)
    VALUES ($1, $2, $3)
    RETURNING id
"#;

fn message_stage(error: StoreError) -> CreateTrackedError {
    CreateTrackedError::new(CreateStage::Message, error)
}

/// PostgreSQL implementation of TrackedMessageRepository
#[derive(Clone)]
pub struct PgTrackedMessageRepository {
    pool: PgPool,
}

impl PgTrackedMessageRepository {
    /// Create a new PgTrackedMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_children(
        tx: &mut Transaction<'_, Postgres>,
        tracked_message_id: i32,
    ) -> RepoResult<(u64, u64)> {
        let emojis = sqlx::query("DELETE FROM role_react_message_emoji WHERE role_react_message_id = $1")
            .bind(tracked_message_id)
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let roles = sqlx::query("DELETE FROM role_react_message_role WHERE role_react_message_id = $1")
            .bind(tracked_message_id)
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        Ok((emojis, roles))
    }
}

#[async_trait]
impl TrackedMessageRepository for PgTrackedMessageRepository {
    #[instrument(skip(self))]
    async fn create(
        &self,
        platform_message_id: Snowflake,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<i32> {
        sqlx::query_scalar::<_, i32>(INSERT_MESSAGE)
            .bind(guild_id.into_inner())
            .bind(channel_id.into_inner())
            .bind(platform_message_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, || StoreError::AlreadyTracked(platform_message_id)))
    }

    /// All inserts share one transaction; dropping it on error rolls back
    #[instrument(skip(self, pairs), fields(pairs = pairs.len()))]
    async fn create_with_pairs(
        &self,
        platform_message_id: Snowflake,
        guild_id: Snowflake,
        channel_id: Snowflake,
        pairs: &[(&str, &str)],
    ) -> Result<i32, CreateTrackedError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| message_stage(map_db_error(e)))?;

        let id = sqlx::query_scalar::<_, i32>(INSERT_MESSAGE)
            .bind(guild_id.into_inner())
            .bind(channel_id.into_inner())
            .bind(platform_message_id.into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                message_stage(map_unique_violation(e, || {
                    StoreError::AlreadyTracked(platform_message_id)
                }))
            })?;

        for (position, &(emoji, role)) in (0i32..).zip(pairs) {
            sqlx::query_scalar::<_, i32>(INSERT_EMOJI)
                .bind(id)
                .bind(position)
                .bind(emoji)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    CreateTrackedError::new(
                        CreateStage::Emoji { position },
                        map_child_insert_error(e, id, position),
                    )
                })?;

            sqlx::query_scalar::<_, i32>(INSERT_ROLE)
                .bind(id)
                .bind(position)
                .bind(role)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    CreateTrackedError::new(
                        CreateStage::Role { position },
                        map_child_insert_error(e, id, position),
                    )
                })?;
        }

        tx.commit().await.map_err(|e| message_stage(map_db_error(e)))?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn add_emoji(&self, tracked_message_id: i32, position: i32, emoji: &str) -> RepoResult<i32> {
        sqlx::query_scalar::<_, i32>(INSERT_EMOJI)
            .bind(tracked_message_id)
            .bind(position)
            .bind(emoji)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_child_insert_error(e, tracked_message_id, position))
    }

    #[instrument(skip(self))]
    async fn add_role(&self, tracked_message_id: i32, position: i32, role: &str) -> RepoResult<i32> {
        sqlx::query_scalar::<_, i32>(INSERT_ROLE)
            .bind(tracked_message_id)
            .bind(position)
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_child_insert_error(e, tracked_message_id, position))
    }

    #[instrument(skip(self))]
    async fn list_emojis(&self, tracked_message_id: i32) -> RepoResult<Vec<TrackedEmoji>> {
        let results = sqlx::query_as::<_, TrackedEmojiModel>(
            r#"
            SELECT id, role_react_message_id, position, emoji
            FROM role_react_message_emoji
            WHERE role_react_message_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(tracked_message_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(TrackedEmoji::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_roles(&self, tracked_message_id: i32) -> RepoResult<Vec<TrackedRole>> {
        let results = sqlx::query_as::<_, TrackedRoleModel>(
            r#"
            SELECT id, role_react_message_id, position, role
            FROM role_react_message_role
            WHERE role_react_message_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(tracked_message_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(TrackedRole::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<TrackedMessage>> {
        let result = sqlx::query_as::<_, TrackedMessageModel>(
            r#"
            SELECT id, discord_guild_id, discord_channel_id, discord_message_id
            FROM role_react_message
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TrackedMessage::from))
    }

    #[instrument(skip(self))]
    async fn find_by_platform_ids(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        platform_message_id: Snowflake,
    ) -> RepoResult<Option<TrackedMessage>> {
        let result = sqlx::query_as::<_, TrackedMessageModel>(
            r#"
            SELECT id, discord_guild_id, discord_channel_id, discord_message_id
            FROM role_react_message
            WHERE discord_guild_id = $1 AND discord_channel_id = $2 AND discord_message_id = $3
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(channel_id.into_inner())
        .bind(platform_message_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TrackedMessage::from))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<TrackedMessage>> {
        let results = sqlx::query_as::<_, TrackedMessageModel>(
            r#"
            SELECT id, discord_guild_id, discord_channel_id, discord_message_id
            FROM role_react_message
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(TrackedMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_emojis(&self, tracked_message_id: i32) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM role_react_message_emoji WHERE role_react_message_id = $1")
            .bind(tracked_message_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_roles(&self, tracked_message_id: i32) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM role_react_message_role WHERE role_react_message_id = $1")
            .bind(tracked_message_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    /// Fails with a foreign-key error while child rows remain
    #[instrument(skip(self))]
    async fn delete_message(&self, tracked_message_id: i32) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM role_react_message WHERE id = $1")
            .bind(tracked_message_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    /// Same three stages as the default, inside one transaction
    #[instrument(skip(self))]
    async fn cascade_delete(&self, tracked_message_id: i32) -> RepoResult<CascadeDeleteCounts> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let (deleted_emojis, deleted_roles) = Self::delete_children(&mut tx, tracked_message_id).await?;

        let deleted_messages = sqlx::query("DELETE FROM role_react_message WHERE id = $1")
            .bind(tracked_message_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        tx.commit().await.map_err(map_db_error)?;

        Ok(CascadeDeleteCounts {
            deleted_emojis,
            deleted_roles,
            deleted_messages,
        })
    }
}
