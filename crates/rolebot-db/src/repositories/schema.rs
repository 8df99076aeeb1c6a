//! PostgreSQL schema lifecycle for the tracked-mapping tables

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use rolebot_core::traits::{RepoResult, SchemaRepository};

use super::error::map_schema_error;

pub const MESSAGE_TABLE: &str = "role_react_message";
pub const EMOJI_TABLE: &str = "role_react_message_emoji";
pub const ROLE_TABLE: &str = "role_react_message_role";

const ALL_TABLES: [&str; 3] = [MESSAGE_TABLE, EMOJI_TABLE, ROLE_TABLE];

/// Child tables first so foreign keys never dangle
const DROP_STATEMENTS: [&str; 3] = [
    "DROP TABLE IF EXISTS role_react_message_role",
    "DROP TABLE IF EXISTS role_react_message_emoji",
    "DROP TABLE IF EXISTS role_react_message",
];

const CREATE_STATEMENTS: [&str; 5] = [
    r#"
    CREATE TABLE role_react_message (
        id SERIAL PRIMARY KEY,
        discord_guild_id BIGINT NOT NULL,
        discord_channel_id BIGINT NOT NULL,
        discord_message_id BIGINT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE role_react_message_emoji (
        id SERIAL PRIMARY KEY,
        role_react_message_id INT NOT NULL REFERENCES role_react_message(id),
        position INT NOT NULL,
        emoji TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE role_react_message_role (
        id SERIAL PRIMARY KEY,
        role_react_message_id INT NOT NULL REFERENCES role_react_message(id),
        position INT NOT NULL,
        role TEXT NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX idx_role_react_message_emoji_parent ON role_react_message_emoji (role_react_message_id, position)",
    "CREATE UNIQUE INDEX idx_role_react_message_role_parent ON role_react_message_role (role_react_message_id, position)",
];

/// PostgreSQL implementation of SchemaRepository
#[derive(Clone)]
pub struct PgSchemaRepository {
    pool: PgPool,
}

impl PgSchemaRepository {
    /// Create a new PgSchemaRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaRepository for PgSchemaRepository {
    #[instrument(skip(self))]
    async fn has_schema(&self) -> RepoResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = ANY($1)
            "#,
        )
        .bind(&ALL_TABLES[..])
        .fetch_one(&self.pool)
        .await
        .map_err(map_schema_error)?;

        Ok(count == ALL_TABLES.len() as i64)
    }

    #[instrument(skip(self))]
    async fn ensure_schema(&self) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_schema_error)?;

        for statement in DROP_STATEMENTS.iter().chain(CREATE_STATEMENTS.iter()) {
            sqlx::query(*statement)
                .execute(&mut *tx)
                .await
                .map_err(map_schema_error)?;
        }

        tx.commit().await.map_err(map_schema_error)?;
        tracing::info!("Created tracked-mapping tables");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn drop_schema(&self) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_schema_error)?;

        for statement in DROP_STATEMENTS {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(map_schema_error)?;
        }

        tx.commit().await.map_err(map_schema_error)?;
        Ok(())
    }
}
