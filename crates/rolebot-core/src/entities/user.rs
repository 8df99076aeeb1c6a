//! User entity

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub bot: bool,
}

impl User {
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            bot: false,
        }
    }

    pub fn new_bot(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            bot: true,
            ..Self::new(id, username)
        }
    }
}
