//! Store errors - failures of the tracked-mapping store

use std::fmt;

use thiserror::Error;

use crate::value_objects::Snowflake;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A tracked message already exists for this platform message
    #[error("Message already tracked: {0}")]
    AlreadyTracked(Snowflake),

    /// Referenced tracked message row doesn't exist (foreign key)
    #[error("Tracked message not found: {0}")]
    TrackedMessageNotFound(i32),

    /// Emoji or role row already stored at this position (unique index)
    #[error("Position {position} already taken on tracked message {tracked_message_id}")]
    DuplicatePosition { tracked_message_id: i32, position: i32 },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyTracked(_) => "ALREADY_TRACKED",
            Self::TrackedMessageNotFound(_) => "UNKNOWN_TRACKED_MESSAGE",
            Self::DuplicatePosition { .. } => "DUPLICATE_POSITION",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Connection-level failure; constraint and schema errors repeat on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// Insert of an atomic tracked-message create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStage {
    Message,
    Emoji { position: i32 },
    Role { position: i32 },
}

impl fmt::Display for CreateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message => write!(f, "message"),
            Self::Emoji { position } => write!(f, "emoji at position {position}"),
            Self::Role { position } => write!(f, "role at position {position}"),
        }
    }
}

/// An atomic create that stored nothing, with the insert that failed
#[derive(Debug, Error)]
#[error("Failed to insert {stage}: {error}")]
pub struct CreateTrackedError {
    pub stage: CreateStage,
    #[source]
    pub error: StoreError,
}

impl CreateTrackedError {
    pub fn new(stage: CreateStage, error: StoreError) -> Self {
        Self { stage, error }
    }
}
