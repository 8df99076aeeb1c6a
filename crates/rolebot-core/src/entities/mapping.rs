//! Reaction-role mapping - the emoji/role pairs of one tracked message,
//! validated and decoded from stored rows

use thiserror::Error;

use super::{TrackedEmoji, TrackedRole};
use crate::value_objects::{mention, Emoji, Snowflake};

/// Stored rows that can't form a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("mapping has no emoji/role pairs")]
    Empty,

    #[error("mapping has {emojis} emojis but {roles} roles")]
    LengthMismatch { emojis: usize, roles: usize },

    #[error("emoji at position {emoji_position} is paired with role at position {role_position}")]
    PositionMismatch { emoji_position: i32, role_position: i32 },
}

/// One emoji/role pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub position: i32,
    pub emoji_token: String,
    /// `None` when the stored token no longer parses; such an entry never matches
    pub emoji: Option<Emoji>,
    pub role_mention: String,
}

impl MappingEntry {
    /// Decode the stored role mention
    pub fn role_id(&self) -> Option<Snowflake> {
        mention::role_id_from_mention(&self.role_mention)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRoleMapping {
    entries: Vec<MappingEntry>,
}

impl ReactionRoleMapping {
    /// Pair rows by index
    ///
    /// Rows are expected in list order (position, then id). Both sequences must
    /// be non-empty, of equal length, and agree on the position of every pair.
    pub fn from_rows(emojis: &[TrackedEmoji], roles: &[TrackedRole]) -> Result<Self, MappingError> {
        if emojis.is_empty() || roles.is_empty() {
            return Err(MappingError::Empty);
        }
        if emojis.len() != roles.len() {
            return Err(MappingError::LengthMismatch {
                emojis: emojis.len(),
                roles: roles.len(),
            });
        }

        if let Some((emoji, role)) = emojis
            .iter()
            .zip(roles)
            .find(|(emoji, role)| emoji.position != role.position)
        {
            return Err(MappingError::PositionMismatch {
                emoji_position: emoji.position,
                role_position: role.position,
            });
        }

        let entries = emojis
            .iter()
            .zip(roles)
            .map(|(emoji, role)| MappingEntry {
                position: emoji.position,
                emoji_token: emoji.emoji.clone(),
                emoji: Emoji::parse(&emoji.emoji),
                role_mention: role.role.clone(),
            })
            .collect();

        Ok(Self { entries })
    }

    /// Entry whose emoji has the same identity as `emoji`
    pub fn entry_for(&self, emoji: &Emoji) -> Option<&MappingEntry> {
        self.entries
            .iter()
            .find(|entry| entry.emoji.as_ref() == Some(emoji))
    }

    pub fn contains(&self, emoji: &Emoji) -> bool {
        self.entry_for(emoji).is_some()
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
