//! Value objects - immutable types that represent domain concepts

mod emoji;
pub mod mention;
mod permissions;
mod snowflake;

pub use emoji::{Emoji, EmojiKey};
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
