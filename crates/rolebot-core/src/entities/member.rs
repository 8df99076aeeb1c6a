//! Guild membership as the platform reports it

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub nickname: Option<String>,
    pub role_ids: Vec<Snowflake>,
}

impl Member {
    pub fn new(guild_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            guild_id,
            user_id,
            nickname: None,
            role_ids: Vec::new(),
        }
    }

    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Role ids whose permissions apply to this member, @everyone included
    pub fn effective_role_ids(&self) -> impl Iterator<Item = Snowflake> + '_ {
        std::iter::once(self.guild_id).chain(self.role_ids.iter().copied())
    }
}
