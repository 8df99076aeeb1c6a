//! Envelope decoding into engine events

use rolebot_cache::EventEnvelope;
use rolebot_core::{
    Emoji, Member, MessageCreateEvent, MessageDeleteEvent, PlatformEvent, ReactionAction,
    ReactionEvent, User,
};
use serde::de::DeserializeOwned;

use super::payloads::{
    EmojiPayload, MessageCreatePayload, MessageDeletePayload, MessageReactionPayload,
};
use super::GatewayEventType;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid {event_type} payload: {source}")]
    InvalidPayload {
        event_type: GatewayEventType,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid emoji in reaction payload: {0}")]
    InvalidEmoji(String),
}

/// Decode one envelope
///
/// Returns `Ok(None)` for event types the bot doesn't consume.
pub fn decode_event(envelope: &EventEnvelope) -> Result<Option<PlatformEvent>, DecodeError> {
    let Some(event_type) = GatewayEventType::parse(&envelope.event_type) else {
        return Ok(None);
    };

    let event = match event_type {
        GatewayEventType::Ready => PlatformEvent::Ready,
        GatewayEventType::MessageReactionAdd => {
            PlatformEvent::ReactionAdd(reaction(ReactionAction::Add, payload(event_type, envelope)?)?)
        }
        GatewayEventType::MessageReactionRemove => PlatformEvent::ReactionRemove(reaction(
            ReactionAction::Remove,
            payload(event_type, envelope)?,
        )?),
        GatewayEventType::MessageDelete => {
            let data: MessageDeletePayload = payload(event_type, envelope)?;
            PlatformEvent::MessageDelete(MessageDeleteEvent {
                id: data.id,
                channel_id: data.channel_id,
                guild_id: data.guild_id,
            })
        }
        GatewayEventType::MessageCreate => {
            let data: MessageCreatePayload = payload(event_type, envelope)?;
            PlatformEvent::MessageCreate(MessageCreateEvent {
                id: data.id,
                channel_id: data.channel_id,
                guild_id: data.guild_id,
                author: User {
                    id: data.author.id,
                    username: data.author.username,
                    bot: data.author.bot,
                },
                content: data.content,
            })
        }
    };

    Ok(Some(event))
}

fn payload<T: DeserializeOwned>(
    event_type: GatewayEventType,
    envelope: &EventEnvelope,
) -> Result<T, DecodeError> {
    serde_json::from_value(envelope.data.clone())
        .map_err(|source| DecodeError::InvalidPayload { event_type, source })
}

fn reaction(action: ReactionAction, data: MessageReactionPayload) -> Result<ReactionEvent, DecodeError> {
    let emoji = match data.emoji {
        EmojiPayload::Object { id, name, animated } => {
            Emoji::from_parts(id, name.as_deref(), animated)
                .ok_or_else(|| DecodeError::InvalidEmoji(format!("{id:?}/{name:?}")))?
        }
        EmojiPayload::Token(token) => {
            Emoji::parse(&token).ok_or(DecodeError::InvalidEmoji(token))?
        }
    };

    // Member data only means something inside a guild
    let member = match (data.member, data.guild_id) {
        (Some(member), Some(guild_id)) => Some(Member {
            guild_id,
            user_id: data.user_id,
            nickname: member.nick,
            role_ids: member.roles,
        }),
        _ => None,
    };

    Ok(ReactionEvent {
        action,
        user_id: data.user_id,
        channel_id: data.channel_id,
        message_id: data.message_id,
        guild_id: data.guild_id,
        emoji,
        member,
    })
}
