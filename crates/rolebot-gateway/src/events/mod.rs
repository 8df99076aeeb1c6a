//! Gateway events
//!
//! Bus envelopes decoded into engine events.

mod decode;
mod event_types;
mod payloads;

pub use decode::{decode_event, DecodeError};
pub use event_types::GatewayEventType;
pub use payloads::{
    EmojiPayload, MemberPayload, MessageCreatePayload, MessageDeletePayload,
    MessageReactionPayload, UserPayload,
};
