//! Inbound platform events

mod platform_event;

pub use platform_event::{
    MessageCreateEvent, MessageDeleteEvent, PlatformEvent, ReactionAction, ReactionEvent,
};
