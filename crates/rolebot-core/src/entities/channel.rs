//! Channel entity - the closed set of channel shapes the platform reports
//!
//! The raw platform type number is resolved into a [`ChannelKind`] once, at the
//! boundary. Engine code only asks capability questions.

use crate::value_objects::Snowflake;

/// Channel variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    GuildText { guild_id: Snowflake },
    GuildAnnouncement { guild_id: Snowflake },
    GuildVoice { guild_id: Snowflake },
    GuildCategory { guild_id: Snowflake },
    DirectMessage,
    /// Any platform channel type the bot doesn't model (threads, stages, forums...)
    Other {
        kind: u8,
        guild_id: Option<Snowflake>,
    },
}

impl ChannelKind {
    pub const GUILD_TEXT: u8 = 0;
    pub const DM: u8 = 1;
    pub const GUILD_VOICE: u8 = 2;
    pub const GUILD_CATEGORY: u8 = 4;
    pub const GUILD_ANNOUNCEMENT: u8 = 5;

    /// Resolve from the platform's numeric type and the optional guild id
    ///
    /// A guild-scoped type without a guild id is not something the platform
    /// sends; it falls back to `Other` rather than inventing a guild.
    pub fn from_wire(kind: u8, guild_id: Option<Snowflake>) -> Self {
        match (kind, guild_id) {
            (Self::DM, _) => Self::DirectMessage,
            (Self::GUILD_TEXT, Some(guild_id)) => Self::GuildText { guild_id },
            (Self::GUILD_ANNOUNCEMENT, Some(guild_id)) => Self::GuildAnnouncement { guild_id },
            (Self::GUILD_VOICE, Some(guild_id)) => Self::GuildVoice { guild_id },
            (Self::GUILD_CATEGORY, Some(guild_id)) => Self::GuildCategory { guild_id },
            (kind, guild_id) => Self::Other { kind, guild_id },
        }
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub name: Option<String>,
    pub kind: ChannelKind,
}

impl Channel {
    /// Create a guild text channel
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            kind: ChannelKind::GuildText { guild_id },
        }
    }

    /// Guild the channel belongs to, `None` for DMs
    pub fn guild_id(&self) -> Option<Snowflake> {
        match self.kind {
            ChannelKind::GuildText { guild_id }
            | ChannelKind::GuildAnnouncement { guild_id }
            | ChannelKind::GuildVoice { guild_id }
            | ChannelKind::GuildCategory { guild_id } => Some(guild_id),
            ChannelKind::DirectMessage => None,
            ChannelKind::Other { guild_id, .. } => guild_id,
        }
    }

    /// Whether messages can be posted and fetched here
    ///
    /// Only guild text and announcement channels host reaction-role messages.
    pub fn supports_message_history(&self) -> bool {
        matches!(
            self.kind,
            ChannelKind::GuildText { .. } | ChannelKind::GuildAnnouncement { .. }
        )
    }

    /// Text-capable channel inside the given guild
    pub fn is_text_in_guild(&self, guild_id: Snowflake) -> bool {
        self.supports_message_history() && self.guild_id() == Some(guild_id)
    }
}
