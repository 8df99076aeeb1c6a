//! Reaction handler - grant or revoke the mapped role for one reaction event
//!
//! Add and remove share one procedure. Lookup misses and platform failures
//! discard the event; only a corrupt stored mapping leads to a store write.

use rolebot_core::{
    Member, ReactionAction, ReactionEvent, ReactionRoleMapping, Snowflake, TrackedMessage,
};
use tracing::{debug, error, instrument, warn};

use super::context::EngineContext;

/// How a reaction event ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Completing a partial payload failed
    FetchFailed,
    /// DM, non-text channel, or a channel the bot can't see
    NotGuildText,
    NotTracked,
    NotMember,
    /// Stored rows didn't form a mapping; the tracked message was removed
    CorruptMappingRemoved,
    /// The emoji isn't part of the mapping; the reaction was removed
    UntrackedReactionRemoved,
    /// Stored role mention doesn't decode
    RoleDecodeFailed,
    /// Mapped role no longer exists on the guild
    RoleMissing,
    /// Member already had (or already lacked) the role
    Unchanged { role_id: Snowflake },
    Granted { role_id: Snowflake },
    Revoked { role_id: Snowflake },
    /// A platform or store call failed mid-way
    Failed,
}

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    #[instrument(
        skip(self, event),
        fields(
            action = event.action.as_str(),
            message_id = %event.message_id,
            user_id = %event.user_id,
            emoji = %event.emoji,
        )
    )]
    pub async fn handle(&self, event: &ReactionEvent) -> ReactionOutcome {
        if event.is_partial() && !self.complete_partial(event).await {
            return ReactionOutcome::FetchFailed;
        }

        let Some(guild_id) = self.resolve_guild(event).await else {
            return ReactionOutcome::NotGuildText;
        };

        let tracked = match self
            .ctx
            .tracked_repo()
            .find_by_platform_ids(guild_id, event.channel_id, event.message_id)
            .await
        {
            Ok(Some(tracked)) => tracked,
            Ok(None) => return ReactionOutcome::NotTracked,
            Err(e) => {
                warn!(error = %e, "Failed to look up tracked message");
                return ReactionOutcome::Failed;
            }
        };

        let member = match &event.member {
            Some(member) => member.clone(),
            None => match self.ctx.platform().fetch_member(guild_id, event.user_id).await {
                Ok(Some(member)) => member,
                Ok(None) => {
                    debug!("Reacting user is not a guild member");
                    return ReactionOutcome::NotMember;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to fetch member");
                    return ReactionOutcome::Failed;
                }
            },
        };

        let mapping = match self.load_mapping(&tracked).await {
            Ok(Some(mapping)) => mapping,
            Ok(None) => return ReactionOutcome::CorruptMappingRemoved,
            Err(()) => return ReactionOutcome::Failed,
        };

        let Some(entry) = mapping.entry_for(&event.emoji) else {
            return self.remove_untracked(event).await;
        };

        let Some(role_id) = entry.role_id() else {
            error!(
                tracked_message_id = tracked.id,
                position = entry.position,
                role = %entry.role_mention,
                "Stored role mention does not decode"
            );
            return ReactionOutcome::RoleDecodeFailed;
        };

        match self.ctx.platform().fetch_role(guild_id, role_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(role_id = %role_id, "Mapped role no longer exists");
                return ReactionOutcome::RoleMissing;
            }
            Err(e) => {
                warn!(role_id = %role_id, error = %e, "Failed to fetch role");
                return ReactionOutcome::Failed;
            }
        }

        // The tracked message may have been removed while we were suspended
        match self.ctx.tracked_repo().find_by_id(tracked.id).await {
            Ok(Some(_)) => {}
            Ok(None) => return ReactionOutcome::NotTracked,
            Err(e) => {
                warn!(error = %e, "Failed to re-check tracked message");
                return ReactionOutcome::Failed;
            }
        }

        self.apply(event.action, &member, role_id).await
    }

    /// Re-fetch what a partial payload leaves out
    async fn complete_partial(&self, event: &ReactionEvent) -> bool {
        match self.ctx.platform().fetch_user(event.user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!("Reacting user no longer exists");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch reacting user");
                return false;
            }
        }

        match self
            .ctx
            .platform()
            .fetch_message(event.channel_id, event.message_id)
            .await
        {
            Ok(Some(_)) => true,
            Ok(None) => {
                debug!("Reacted message no longer exists");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch reacted message");
                false
            }
        }
    }

    /// Guild of a text-capable channel, `None` to discard
    async fn resolve_guild(&self, event: &ReactionEvent) -> Option<Snowflake> {
        let channel = match self.ctx.platform().fetch_channel(event.channel_id).await {
            Ok(Some(channel)) => channel,
            Ok(None) => {
                debug!(channel_id = %event.channel_id, "Channel not visible");
                return None;
            }
            Err(e) => {
                warn!(channel_id = %event.channel_id, error = %e, "Failed to fetch channel");
                return None;
            }
        };

        if !channel.supports_message_history() {
            return None;
        }
        channel.guild_id().or(event.guild_id)
    }

    /// `Ok(None)` when the rows were corrupt and have been removed
    async fn load_mapping(&self, tracked: &TrackedMessage) -> Result<Option<ReactionRoleMapping>, ()> {
        let repo = self.ctx.tracked_repo();
        let rows = tokio::try_join!(repo.list_emojis(tracked.id), repo.list_roles(tracked.id));
        let (emojis, roles) = rows.map_err(|e| {
            warn!(tracked_message_id = tracked.id, error = %e, "Failed to load mapping");
        })?;

        match ReactionRoleMapping::from_rows(&emojis, &roles) {
            Ok(mapping) => Ok(Some(mapping)),
            Err(reason) => {
                warn!(tracked_message_id = tracked.id, %reason, "Corrupt mapping, removing tracked message");
                if let Err(e) = repo.cascade_delete(tracked.id).await {
                    warn!(tracked_message_id = tracked.id, error = %e, "Failed to remove corrupt mapping");
                    return Err(());
                }
                Ok(None)
            }
        }
    }

    async fn remove_untracked(&self, event: &ReactionEvent) -> ReactionOutcome {
        match self
            .ctx
            .platform()
            .remove_reaction(event.channel_id, event.message_id, &event.emoji)
            .await
        {
            Ok(()) => {
                debug!("Removed untracked reaction");
                ReactionOutcome::UntrackedReactionRemoved
            }
            Err(e) => {
                warn!(error = %e, "Failed to remove untracked reaction");
                ReactionOutcome::Failed
            }
        }
    }

    async fn apply(&self, action: ReactionAction, member: &Member, role_id: Snowflake) -> ReactionOutcome {
        let platform = self.ctx.platform();
        let holds = member.has_role(role_id);

        let result = match action {
            ReactionAction::Add if holds => return ReactionOutcome::Unchanged { role_id },
            ReactionAction::Remove if !holds => return ReactionOutcome::Unchanged { role_id },
            ReactionAction::Add => platform
                .grant_role(member.guild_id, member.user_id, role_id)
                .await
                .map(|()| ReactionOutcome::Granted { role_id }),
            ReactionAction::Remove => platform
                .revoke_role(member.guild_id, member.user_id, role_id)
                .await
                .map(|()| ReactionOutcome::Revoked { role_id }),
        };

        match result {
            Ok(outcome) => {
                debug!(role_id = %role_id, ?outcome, "Applied reaction role");
                outcome
            }
            Err(e) => {
                warn!(role_id = %role_id, error = %e, "Failed to apply reaction role");
                ReactionOutcome::Failed
            }
        }
    }
}
