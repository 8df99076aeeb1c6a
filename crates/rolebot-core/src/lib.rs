//! # rolebot-core
//!
//! Domain layer containing the tracked-mapping entities, the platform object
//! model, value objects (ids, permissions, emoji and mention codecs), ports,
//! and inbound platform events.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    CascadeDeleteCounts, Channel, ChannelKind, CustomEmoji, Guild, MappingEntry, MappingError,
    Member, Message, MessageReaction, ReactionRoleMapping, Role, TrackedEmoji, TrackedMessage,
    TrackedRole, User,
};
pub use error::{CreateStage, CreateTrackedError, PlatformError, StoreError};
pub use events::{
    MessageCreateEvent, MessageDeleteEvent, PlatformEvent, ReactionAction, ReactionEvent,
};
pub use traits::{
    Platform, PlatformResult, RepoResult, SchemaRepository, TrackedMessageRepository,
};
pub use value_objects::{mention, Emoji, EmojiKey, Permissions, Snowflake, SnowflakeParseError};
