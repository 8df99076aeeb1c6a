//! Error types for the domain ports

mod platform_error;
mod store_error;

pub use platform_error::PlatformError;
pub use store_error::{CreateStage, CreateTrackedError, StoreError};
