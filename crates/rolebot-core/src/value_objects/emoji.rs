//! Emoji tokens as typed by operators, stored per tracked emoji, and carried
//! by reaction events.
//!
//! Accepted token forms:
//! - unicode literal, anything without a `:` (`🔵`)
//! - custom emoji mention `<:name:id>` or animated `<a:name:id>`
//! - bare custom reference `name:id` / `a:name:id`
//!
//! Two emojis are the same reaction when their identity matches: the custom
//! emoji id when there is one, otherwise the unicode text. Names of custom
//! emojis are ignored for equality since they can be renamed on the guild.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::Snowflake;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 32;

#[derive(Debug, Clone)]
pub enum Emoji {
    Unicode(String),
    Custom {
        id: Snowflake,
        name: String,
        animated: bool,
    },
}

/// Identity of an emoji, see module docs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmojiKey<'a> {
    Custom(Snowflake),
    Unicode(&'a str),
}

impl Emoji {
    /// Parse an emoji token, `None` on malformed input
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        if !token.contains(':') {
            if token.starts_with('<') || token.chars().any(char::is_whitespace) {
                return None;
            }
            return Some(Self::Unicode(token.to_string()));
        }

        let inner = match (token.strip_prefix('<'), token.ends_with('>')) {
            (Some(rest), true) => rest.strip_suffix('>')?,
            (None, false) => token,
            _ => return None,
        };

        let parts: Vec<&str> = inner.split(':').collect();
        let (animated, name, id) = match parts.as_slice() {
            [name, id] => (false, *name, *id),
            ["", name, id] => (false, *name, *id),
            ["a", name, id] => (true, *name, *id),
            _ => return None,
        };

        if !is_valid_name(name) {
            return None;
        }
        let id = Snowflake::parse(id).ok()?;

        Some(Self::Custom {
            id,
            name: name.to_string(),
            animated,
        })
    }

    /// Build from the loose fields reaction payloads carry
    ///
    /// A payload with an id is a custom emoji (the name may be missing when the
    /// emoji was deleted from the guild); without one the name is the unicode text.
    pub fn from_parts(id: Option<Snowflake>, name: Option<&str>, animated: bool) -> Option<Self> {
        match (id, name) {
            (Some(id), name) => Some(Self::Custom {
                id,
                name: name.unwrap_or_default().to_string(),
                animated,
            }),
            (None, Some(name)) if !name.is_empty() => Some(Self::Unicode(name.to_string())),
            _ => None,
        }
    }

    pub fn key(&self) -> EmojiKey<'_> {
        match self {
            Self::Unicode(text) => EmojiKey::Unicode(text),
            Self::Custom { id, .. } => EmojiKey::Custom(*id),
        }
    }

    pub fn custom_id(&self) -> Option<Snowflake> {
        match self {
            Self::Custom { id, .. } => Some(*id),
            Self::Unicode(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.custom_id().is_some()
    }

    /// Form used in reaction endpoints: the unicode text or `name:id`
    pub fn reaction_identifier(&self) -> String {
        match self {
            Self::Unicode(text) => text.clone(),
            Self::Custom { id, name, .. } => format!("{name}:{id}"),
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    (NAME_MIN..=NAME_MAX).contains(&name.len())
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Renders the form that displays the emoji inside message text
impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(text) => f.write_str(text),
            Self::Custom {
                id,
                name,
                animated: true,
            } => write!(f, "<a:{name}:{id}>"),
            Self::Custom { id, name, .. } => write!(f, "<:{name}:{id}>"),
        }
    }
}

impl PartialEq for Emoji {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Emoji {}

impl Hash for Emoji {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
