//! Platform ids
//!
//! Guilds, channels, messages, users, roles and custom emojis all share one
//! 64-bit id space. The top 42 bits are a millisecond timestamp relative to
//! the platform epoch, which is the only part of the layout the bot reads.
//! Tracked rows keep ids as BIGINT, so the inner value is signed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

/// 2015-01-01T00:00:00Z in unix milliseconds
const PLATFORM_EPOCH_MS: i64 = 1_420_070_400_000;
const TIMESTAMP_SHIFT: u32 = 22;

impl Snowflake {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Creation time in unix milliseconds
    pub fn timestamp(&self) -> i64 {
        (self.0 >> TIMESTAMP_SHIFT) + PLATFORM_EPOCH_MS
    }

    /// Decimal digits only: no sign, no surrounding whitespace
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SnowflakeParseError);
        }
        s.parse().map(Self).map_err(|_| SnowflakeParseError)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid snowflake")]
pub struct SnowflakeParseError;

impl FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

/// Written as a JSON string, like the platform does
impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSnowflake {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawSnowflake::deserialize(deserializer)? {
            RawSnowflake::Number(id) => Ok(Self(id)),
            RawSnowflake::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}
