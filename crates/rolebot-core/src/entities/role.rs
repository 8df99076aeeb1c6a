//! Role entity

use crate::value_objects::{Permissions, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    pub permissions: Permissions,
}

impl Role {
    pub fn new(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
            permissions: Permissions::empty(),
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}
