//! Mention codec - role and channel mentions embedded in message text
//!
//! Roles are written `<@&ID>`, channels `<#ID>`. Decoding never fails loudly;
//! malformed input yields `None`.

use super::Snowflake;

const ROLE_PREFIX: &str = "<@&";
const CHANNEL_PREFIX: &str = "<#";
const SUFFIX: &str = ">";

fn strip<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.trim()
        .strip_prefix(prefix)?
        .strip_suffix(SUFFIX)
}

fn decode(s: &str, prefix: &str) -> Option<Snowflake> {
    Snowflake::parse(strip(s, prefix)?).ok()
}

/// `<@&ID>` with a numeric ID
pub fn is_role_mention(s: &str) -> bool {
    role_id_from_mention(s).is_some()
}

/// `<#ID>` with a numeric ID
pub fn is_channel_mention(s: &str) -> bool {
    channel_id_from_mention(s).is_some()
}

pub fn role_id_from_mention(s: &str) -> Option<Snowflake> {
    decode(s, ROLE_PREFIX)
}

pub fn channel_id_from_mention(s: &str) -> Option<Snowflake> {
    decode(s, CHANNEL_PREFIX)
}

/// Encode a role id as a mention string (the form stored per tracked role)
pub fn role_mention(id: Snowflake) -> String {
    format!("{ROLE_PREFIX}{id}{SUFFIX}")
}

pub fn channel_mention(id: Snowflake) -> String {
    format!("{CHANNEL_PREFIX}{id}{SUFFIX}")
}
