//! Engine context - dependency container for engine services
//!
//! Holds the store ports and the platform client. Both are long-lived and
//! shared by every concurrent task.

use std::sync::Arc;

use rolebot_core::traits::{Platform, SchemaRepository, TrackedMessageRepository};

use super::error::{EngineError, EngineResult};

/// Engine context containing all dependencies
#[derive(Clone)]
pub struct EngineContext {
    tracked_repo: Arc<dyn TrackedMessageRepository>,
    schema_repo: Arc<dyn SchemaRepository>,
    platform: Arc<dyn Platform>,
}

impl EngineContext {
    /// Create a new engine context
    pub fn new(
        tracked_repo: Arc<dyn TrackedMessageRepository>,
        schema_repo: Arc<dyn SchemaRepository>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            tracked_repo,
            schema_repo,
            platform,
        }
    }

    /// Get the tracked-message repository
    pub fn tracked_repo(&self) -> &dyn TrackedMessageRepository {
        self.tracked_repo.as_ref()
    }

    /// Get the schema repository
    pub fn schema_repo(&self) -> &dyn SchemaRepository {
        self.schema_repo.as_ref()
    }

    /// Get the platform client
    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("repositories", &"...")
            .field("platform", &"dyn Platform")
            .finish()
    }
}

/// Builder for creating EngineContext
#[derive(Default)]
pub struct EngineContextBuilder {
    tracked_repo: Option<Arc<dyn TrackedMessageRepository>>,
    schema_repo: Option<Arc<dyn SchemaRepository>>,
    platform: Option<Arc<dyn Platform>>,
}

impl EngineContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_repo(mut self, repo: Arc<dyn TrackedMessageRepository>) -> Self {
        self.tracked_repo = Some(repo);
        self
    }

    pub fn schema_repo(mut self, repo: Arc<dyn SchemaRepository>) -> Self {
        self.schema_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Build the EngineContext
    ///
    /// # Errors
    /// Returns `EngineError::Validation` if any dependency is missing
    pub fn build(self) -> EngineResult<EngineContext> {
        Ok(EngineContext::new(
            self.tracked_repo
                .ok_or_else(|| EngineError::validation("tracked_repo is required"))?,
            self.schema_repo
                .ok_or_else(|| EngineError::validation("schema_repo is required"))?,
            self.platform
                .ok_or_else(|| EngineError::validation("platform is required"))?,
        ))
    }
}
