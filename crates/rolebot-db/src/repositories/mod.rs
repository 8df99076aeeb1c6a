//! Repository implementations
//!
//! PostgreSQL implementations of the store ports defined in rolebot-core.

mod error;
mod schema;
mod tracked_message;

pub use schema::{PgSchemaRepository, EMOJI_TABLE, MESSAGE_TABLE, ROLE_TABLE};
pub use tracked_message::PgTrackedMessageRepository;
