//! Guild custom emoji

use crate::value_objects::{Emoji, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEmoji {
    pub id: Snowflake,
    pub name: String,
    pub animated: bool,
}

impl CustomEmoji {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            animated: false,
        }
    }

    pub fn to_emoji(&self) -> Emoji {
        Emoji::Custom {
            id: self.id,
            name: self.name.clone(),
            animated: self.animated,
        }
    }
}
