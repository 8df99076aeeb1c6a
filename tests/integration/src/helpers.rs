//! Shared setup for the integration tests

use std::sync::Arc;

use rolebot_core::{
    mention, Emoji, Member, MessageCreateEvent, MessageDeleteEvent, Permissions, ReactionAction,
    ReactionEvent, Snowflake, User,
};
use rolebot_engine::{
    CreateTrackedMessage, CreatedTrackedMessage, CreationService, EngineContext,
    EngineContextBuilder, ReactionRolePair,
};

use crate::fixtures::{FakePlatform, MemoryStore};

pub const GUILD: Snowflake = Snowflake::new(1_000);
pub const CHANNEL: Snowflake = Snowflake::new(2_000);
pub const VOICE_CHANNEL: Snowflake = Snowflake::new(2_001);
pub const ROLE_A: Snowflake = Snowflake::new(3_001);
pub const ROLE_B: Snowflake = Snowflake::new(3_002);
pub const ADMIN_ROLE: Snowflake = Snowflake::new(3_100);
pub const OWNER: Snowflake = Snowflake::new(4_000);
pub const ALICE: Snowflake = Snowflake::new(4_001);
pub const BOB: Snowflake = Snowflake::new(4_002);
pub const REACTION_BOT: Snowflake = Snowflake::new(4_999);

pub fn blue() -> Emoji {
    Emoji::Unicode("🔵".to_string())
}

pub fn green() -> Emoji {
    Emoji::Unicode("🟢".to_string())
}

pub fn red() -> Emoji {
    Emoji::Unicode("🔴".to_string())
}

/// Store, platform and an engine context over both
pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub platform: Arc<FakePlatform>,
    pub ctx: EngineContext,
}

impl TestEnv {
    /// One guild with a text channel, two assignable roles, and Alice and Bob
    /// as members without roles
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let platform = Arc::new(FakePlatform::new());

        platform.add_guild(GUILD, OWNER);
        platform.add_text_channel(CHANNEL, GUILD);
        platform.add_channel(rolebot_core::Channel {
            id: VOICE_CHANNEL,
            name: Some("voice".to_string()),
            kind: rolebot_core::ChannelKind::GuildVoice { guild_id: GUILD },
        });
        platform.add_role(GUILD, ROLE_A, Permissions::empty());
        platform.add_role(GUILD, ROLE_B, Permissions::empty());
        platform.add_role(GUILD, ADMIN_ROLE, Permissions::ADMINISTRATOR);
        platform.add_member(GUILD, OWNER, &[]);
        platform.add_member(GUILD, ALICE, &[]);
        platform.add_member(GUILD, BOB, &[]);
        platform.add_user(User::new_bot(REACTION_BOT, "helper-bot"));
        platform.add_member(GUILD, REACTION_BOT, &[]);

        let ctx = EngineContextBuilder::new()
            .tracked_repo(store.clone())
            .schema_repo(store.clone())
            .platform(platform.clone())
            .build()
            .unwrap();

        Self {
            store,
            platform,
            ctx,
        }
    }

    /// Reaction-role message mapping 🔵 to role A and 🟢 to role B
    pub async fn create_blue_green(&self) -> CreatedTrackedMessage {
        CreationService::new(&self.ctx)
            .create(blue_green_request())
            .await
            .unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn blue_green_request() -> CreateTrackedMessage {
    CreateTrackedMessage {
        guild_id: GUILD,
        channel_id: CHANNEL,
        body: "Pick a team".to_string(),
        pairs: vec![
            ReactionRolePair::new("🔵", mention::role_mention(ROLE_A)),
            ReactionRolePair::new("🟢", mention::role_mention(ROLE_B)),
        ],
    }
}

/// Reaction event without embedded member data
pub fn partial_reaction(
    action: ReactionAction,
    message_id: Snowflake,
    user_id: Snowflake,
    emoji: Emoji,
) -> ReactionEvent {
    ReactionEvent {
        action,
        user_id,
        channel_id: CHANNEL,
        message_id,
        guild_id: Some(GUILD),
        emoji,
        member: None,
    }
}

/// Reaction event carrying the member as the platform sends it
pub fn full_reaction(
    action: ReactionAction,
    message_id: Snowflake,
    member: Member,
    emoji: Emoji,
) -> ReactionEvent {
    ReactionEvent {
        action,
        user_id: member.user_id,
        channel_id: CHANNEL,
        message_id,
        guild_id: Some(member.guild_id),
        emoji,
        member: Some(member),
    }
}

pub fn message_deleted(message_id: Snowflake) -> MessageDeleteEvent {
    MessageDeleteEvent {
        id: message_id,
        channel_id: CHANNEL,
        guild_id: Some(GUILD),
    }
}

/// A guild message posted by `author_id`
pub fn command_message(author_id: Snowflake, content: &str) -> MessageCreateEvent {
    MessageCreateEvent {
        id: Snowflake::new(5_000),
        channel_id: CHANNEL,
        guild_id: Some(GUILD),
        author: User::new(author_id, format!("user-{author_id}")),
        content: content.to_string(),
    }
}
