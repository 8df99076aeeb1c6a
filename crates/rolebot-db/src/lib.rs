//! # rolebot-db
//!
//! Database layer implementing the tracked-mapping store ports with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Schema lifecycle (`role_react_message` and its emoji/role child tables)
//! - Repository implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rolebot_db::pool::{create_pool, PoolConfig};
//! use rolebot_db::repositories::PgTrackedMessageRepository;
//! use rolebot_core::traits::TrackedMessageRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/rolebot")).await?;
//!     let repo = PgTrackedMessageRepository::new(pool);
//!     let tracked = repo.list_all().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{PgSchemaRepository, PgTrackedMessageRepository};
