//! Ports implemented by the infrastructure crates

mod platform;
mod repositories;

pub use platform::{Platform, PlatformResult};
pub use repositories::{RepoResult, SchemaRepository, TrackedMessageRepository};
