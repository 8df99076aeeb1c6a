//! Role permission bits
//!
//! Only the bits the bot looks at are named. Unknown bits are retained so a
//! role's permission field survives decoding unchanged.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        /// Grants every other permission
        const ADMINISTRATOR   = 1 << 3;
        const ADD_REACTIONS   = 1 << 6;
        const VIEW_CHANNEL    = 1 << 10;
        const SEND_MESSAGES   = 1 << 11;
        /// Needed to clear other users' reactions
        const MANAGE_MESSAGES = 1 << 13;
        const MANAGE_ROLES    = 1 << 28;

        const _ = !0;
    }
}

impl Permissions {
    /// Union of the permissions of several roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Self::empty(), |acc, p| acc | p)
    }

    /// Decimal bit field, as the platform writes it
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse().map(Self::from_bits_retain)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bits(), f)
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPermissions {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawPermissions::deserialize(deserializer)? {
            RawPermissions::Number(bits) => Ok(Self::from_bits_retain(bits)),
            RawPermissions::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}
