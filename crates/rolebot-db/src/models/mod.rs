//! Database models with SQLx `FromRow` derives

mod tracked_message;

pub use tracked_message::{TrackedEmojiModel, TrackedMessageModel, TrackedRoleModel};
