//! Message-delete handler - drop the mapping of a deleted tracked message

use rolebot_core::{CascadeDeleteCounts, MessageDeleteEvent, StoreError, TrackedMessageRepository};
use tracing::{debug, info, instrument, warn};

use super::context::EngineContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDeleteOutcome {
    NotGuildText,
    NotTracked,
    Removed(CascadeDeleteCounts),
    Failed,
}

/// Message-delete service
pub struct MessageDeleteService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> MessageDeleteService<'a> {
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, event), fields(message_id = %event.id, channel_id = %event.channel_id))]
    pub async fn handle(&self, event: &MessageDeleteEvent) -> MessageDeleteOutcome {
        let Some(guild_id) = event.guild_id else {
            return MessageDeleteOutcome::NotGuildText;
        };

        // The lookup only needs ids; a failed channel fetch doesn't block cleanup
        match self.ctx.platform().fetch_channel(event.channel_id).await {
            Ok(Some(channel)) if !channel.supports_message_history() => {
                return MessageDeleteOutcome::NotGuildText;
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Failed to fetch channel of deleted message"),
        }

        let repo = self.ctx.tracked_repo();
        let tracked = match repo
            .find_by_platform_ids(guild_id, event.channel_id, event.id)
            .await
        {
            Ok(Some(tracked)) => tracked,
            Ok(None) => return MessageDeleteOutcome::NotTracked,
            Err(e) => {
                warn!(error = %e, "Failed to look up tracked message");
                return MessageDeleteOutcome::Failed;
            }
        };

        match Self::delete_stages(repo, tracked.id).await {
            Ok(counts) => {
                info!(
                    tracked_message_id = tracked.id,
                    deleted_emojis = counts.deleted_emojis,
                    deleted_roles = counts.deleted_roles,
                    "Tracked message deleted"
                );
                MessageDeleteOutcome::Removed(counts)
            }
            Err(e) => {
                warn!(tracked_message_id = tracked.id, error = %e, "Failed to delete tracked message");
                MessageDeleteOutcome::Failed
            }
        }
    }

    /// Emoji rows, then role rows, then the message row
    async fn delete_stages(
        repo: &dyn TrackedMessageRepository,
        tracked_message_id: i32,
    ) -> Result<CascadeDeleteCounts, StoreError> {
        let deleted_emojis = repo.delete_emojis(tracked_message_id).await?;
        if deleted_emojis == 0 {
            warn!(tracked_message_id, "No emoji rows to delete");
        }
        let deleted_roles = repo.delete_roles(tracked_message_id).await?;
        if deleted_roles == 0 {
            warn!(tracked_message_id, "No role rows to delete");
        }
        let deleted_messages = repo.delete_message(tracked_message_id).await?;
        if deleted_messages == 0 {
            warn!(tracked_message_id, "Tracked message row already gone");
        }

        Ok(CascadeDeleteCounts {
            deleted_emojis,
            deleted_roles,
            deleted_messages,
        })
    }
}
