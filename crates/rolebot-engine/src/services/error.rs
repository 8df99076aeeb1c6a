//! Engine error types

use rolebot_core::{PlatformError, StoreError};

/// Engine error type
///
/// Only the creation flow and startup surface these; event handlers report
/// outcomes instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The platform refused the message; nothing was stored
    #[error("Failed to send message: {0}")]
    SendFailed(#[source] PlatformError),

    /// A step after the send failed and was compensated
    #[error("{message}")]
    CreationFailed {
        message: String,
        #[source]
        cause: Box<EngineError>,
    },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn creation_failed(message: impl Into<String>, cause: impl Into<EngineError>) -> Self {
        Self::CreationFailed {
            message: message.into(),
            cause: Box::new(cause.into()),
        }
    }

    /// Get an error code string for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Store(e) => e.code(),
            Self::Platform(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::SendFailed(_) => "SEND_FAILED",
            Self::CreationFailed { .. } => "CREATION_FAILED",
        }
    }

    /// Text safe to show the operator who invoked a command
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::SendFailed(_) => "Error sending the message to the target channel!".to_string(),
            Self::CreationFailed { message, .. } => message.clone(),
            Self::Store(StoreError::AlreadyTracked(id)) => {
                format!("Message '{id}' is already tracked!")
            }
            Self::Store(_) | Self::Platform(_) => "Error while processing your request".to_string(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
