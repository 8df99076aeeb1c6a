//! Platform errors - failures talking to the remote chat platform
//!
//! "Not found" is not an error: fetches return `Ok(None)` for it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Bot token rejected or missing permission for the call
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Response body didn't have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl PlatformError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::Decode(_) => "DECODE_ERROR",
        }
    }

    /// Worth retrying later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RateLimited { .. } => true,
            Self::UnexpectedStatus { status, .. } => *status >= 500,
            Self::Unauthorized(_) | Self::Decode(_) => false,
        }
    }
}
