//! REST response bodies and their conversion into core entities

use rolebot_core::{
    Channel, ChannelKind, CustomEmoji, Emoji, Guild, Member, Message, MessageReaction,
    Permissions, Role, Snowflake, User,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GuildResponse {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
}

impl From<GuildResponse> for Guild {
    fn from(r: GuildResponse) -> Self {
        Guild::new(r.id, r.name, r.owner_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ChannelResponse> for Channel {
    fn from(r: ChannelResponse) -> Self {
        Channel {
            id: r.id,
            name: r.name,
            kind: ChannelKind::from_wire(r.kind, r.guild_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: Snowflake,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

impl From<UserResponse> for User {
    fn from(r: UserResponse) -> Self {
        User {
            id: r.id,
            username: r.username,
            bot: r.bot,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub user: UserResponse,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

impl MemberResponse {
    pub fn into_member(self, guild_id: Snowflake) -> Member {
        Member {
            guild_id,
            user_id: self.user.id,
            nickname: self.nick,
            role_ids: self.roles,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleResponse {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
}

impl RoleResponse {
    pub fn into_role(self, guild_id: Snowflake) -> Role {
        Role::new(self.id, guild_id, self.name).with_permissions(self.permissions)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmojiResponse {
    #[serde(default)]
    pub id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

impl EmojiResponse {
    pub fn into_emoji(self) -> Option<Emoji> {
        Emoji::from_parts(self.id, self.name.as_deref(), self.animated)
    }

    /// Guild emoji lookups always carry an id
    pub fn into_custom(self) -> Option<CustomEmoji> {
        Some(CustomEmoji {
            id: self.id?,
            name: self.name.unwrap_or_default(),
            animated: self.animated,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ReactionResponse {
    pub count: u32,
    #[serde(default)]
    pub me: bool,
    pub emoji: EmojiResponse,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub reactions: Vec<ReactionResponse>,
}

impl From<MessageResponse> for Message {
    fn from(r: MessageResponse) -> Self {
        let reactions = r
            .reactions
            .into_iter()
            .filter_map(|reaction| {
                Some(MessageReaction {
                    emoji: reaction.emoji.into_emoji()?,
                    count: reaction.count,
                    me: reaction.me,
                })
            })
            .collect();

        Message {
            id: r.id,
            channel_id: r.channel_id,
            guild_id: r.guild_id,
            content: r.content,
            reactions,
        }
    }
}

/// Body of a create-message request
#[derive(Debug, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub content: &'a str,
}

/// Body of a 429 response
#[derive(Debug, Deserialize)]
pub struct RateLimitResponse {
    /// Seconds
    pub retry_after: f64,
}
