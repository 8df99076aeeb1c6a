//! Process-level errors
//!
//! What can stop the bot from starting: configuration, the store, the event
//! bus, or the platform rejecting the bot's credentials.

use rolebot_core::{PlatformError, StoreError};

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Event bus error: {0}")]
    EventBus(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Internal error: {0}")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Store(e) => e.code(),
            Self::EventBus(_) => "EVENT_BUS_ERROR",
            Self::Platform(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// A restart may succeed without operator action
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(_) | Self::EventBus(_) => true,
            Self::Store(e) => e.is_transient(),
            Self::Platform(e) => e.is_transient(),
            Self::Config(_) | Self::Internal(_) => false,
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
