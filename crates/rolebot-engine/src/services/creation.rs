//! Creation flow - post a reaction-role message and track its mapping
//!
//! Steps: send the message, then store the tracked record together with every
//! emoji/role pair in one atomic write. A store failure deletes the sent
//! message again, so a tracked message is either fully populated or absent.

use rolebot_core::{mention, CreateStage, CreateTrackedError, Emoji, Message, Snowflake};
use tracing::{info, instrument, warn};

use super::context::EngineContext;
use super::error::{EngineError, EngineResult};
use super::saga::{Compensation, Saga};

/// One emoji/role line of a reaction-role message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRolePair {
    pub emoji: String,
    pub role: String,
    pub description: Option<String>,
}

impl ReactionRolePair {
    pub fn new(emoji: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            role: role.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input of the creation flow
#[derive(Debug, Clone)]
pub struct CreateTrackedMessage {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub body: String,
    pub pairs: Vec<ReactionRolePair>,
}

/// Result of a successful creation
#[derive(Debug, Clone)]
pub struct CreatedTrackedMessage {
    pub tracked_message_id: i32,
    pub message: Message,
}

/// Final message text: the body, then one line per pair in input order
pub fn build_message_text(body: &str, pairs: &[ReactionRolePair]) -> String {
    let mut text = body.to_string();
    for pair in pairs {
        text.push_str("\n- ");
        text.push_str(&pair.emoji);
        text.push_str(" => ");
        text.push_str(&pair.role);
        if let Some(description) = &pair.description {
            text.push_str(" - ");
            text.push_str(description);
        }
    }
    text
}

/// Reject input that could never form a usable mapping
fn validate(pairs: &[ReactionRolePair]) -> EngineResult<()> {
    if pairs.is_empty() {
        return Err(EngineError::validation(
            "At least one emoji/role pair is required!",
        ));
    }
    for pair in pairs {
        if Emoji::parse(&pair.emoji).is_none() {
            return Err(EngineError::validation(format!(
                "Not a valid emoji '{}'",
                pair.emoji
            )));
        }
        if !mention::is_role_mention(&pair.role) {
            return Err(EngineError::validation(format!(
                "Not a valid role mention '{}'",
                pair.role
            )));
        }
    }
    Ok(())
}

/// Operator-facing error naming the insert that failed
fn store_failure(pairs: &[ReactionRolePair], e: CreateTrackedError) -> EngineError {
    let pair_at = |position: i32| usize::try_from(position).ok().and_then(|i| pairs.get(i));
    let message = match e.stage {
        CreateStage::Emoji { position } => pair_at(position)
            .map(|pair| format!("Error inserting emoji '{}' into the database!", pair.emoji)),
        CreateStage::Role { position } => pair_at(position)
            .map(|pair| format!("Error inserting role '{}' into the database!", pair.role)),
        CreateStage::Message => None,
    }
    .unwrap_or_else(|| "Error inserting message data into the database!".to_string());

    EngineError::creation_failed(message, e.error)
}

/// Creation service
pub struct CreationService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> CreationService<'a> {
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Send the message and persist its mapping
    ///
    /// # Errors
    /// - `Validation` before anything is sent
    /// - `SendFailed` when the platform refuses the message; nothing is stored
    /// - `CreationFailed` when the store write fails; the sent message is deleted
    #[instrument(skip(self, request), fields(channel_id = %request.channel_id, pairs = request.pairs.len()))]
    pub async fn create(&self, request: CreateTrackedMessage) -> EngineResult<CreatedTrackedMessage> {
        validate(&request.pairs)?;

        let text = build_message_text(&request.body, &request.pairs);
        let message = self
            .ctx
            .platform()
            .send_message(request.channel_id, &text)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to send reaction-role message");
                EngineError::SendFailed(e)
            })?;

        let mut saga = Saga::new(self.ctx, "create_tracked_message");
        saga.record(Compensation::DeletePlatformMessage {
            channel_id: request.channel_id,
            message_id: message.id,
        });

        let pairs: Vec<(&str, &str)> = request
            .pairs
            .iter()
            .map(|pair| (pair.emoji.as_str(), pair.role.as_str()))
            .collect();

        let tracked_message_id = match self
            .ctx
            .tracked_repo()
            .create_with_pairs(message.id, request.guild_id, request.channel_id, &pairs)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                let report = saga.compensate().await;
                warn!(
                    message_id = %message.id,
                    stage = %e.stage,
                    error = %e.error,
                    compensations = report.attempted,
                    compensations_failed = report.failed,
                    "Failed to store tracked message"
                );
                return Err(store_failure(&request.pairs, e));
            }
        };

        saga.complete();
        info!(
            tracked_message_id,
            message_id = %message.id,
            pairs = request.pairs.len(),
            "Reaction-role message created"
        );

        Ok(CreatedTrackedMessage {
            tracked_message_id,
            message,
        })
    }
}
