//! Domain entities - tracked mappings and the platform object model

mod channel;
mod emoji;
mod guild;
mod mapping;
mod member;
mod message;
mod role;
mod tracked;
mod user;

pub use channel::{Channel, ChannelKind};
pub use emoji::CustomEmoji;
pub use guild::Guild;
pub use mapping::{MappingEntry, MappingError, ReactionRoleMapping};
pub use member::Member;
pub use message::{Message, MessageReaction};
pub use role::Role;
pub use tracked::{CascadeDeleteCounts, TrackedEmoji, TrackedMessage, TrackedRole};
pub use user::User;
