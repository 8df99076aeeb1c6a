//! Startup reconciler - repair drift accumulated while the bot was offline
//!
//! On a fresh store the schema is created and nothing else happens. Otherwise
//! every tracked message is verified against the platform (message, emojis,
//! roles) and removed when any check fails; survivors get their reactions
//! pruned and their reactors' roles re-granted.
//!
//! A lookup that returns "not found" fails verification. A lookup that
//! errors leaves the tracked message alone until the next start.

use chrono::{DateTime, Utc};
use rolebot_core::{
    mention, Emoji, Guild, Message, ReactionRoleMapping, Snowflake, TrackedEmoji, TrackedMessage,
    TrackedRole,
};
use tracing::{debug, info, instrument, warn};

use super::context::EngineContext;
use super::error::EngineResult;

/// Summary of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Schema was missing and has been created; nothing else ran
    pub schema_created: bool,
    pub checked: usize,
    pub removed: usize,
    /// Whole reactions removed because their emoji isn't tracked
    pub reactions_removed: usize,
    /// Single reactions removed because the user left the guild
    pub user_reactions_removed: usize,
    pub roles_granted: usize,
    /// Calls that errored; the affected work is retried on the next start
    pub failures: usize,
}

impl ReconcileReport {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            schema_created: false,
            checked: 0,
            removed: 0,
            reactions_removed: 0,
            user_reactions_removed: 0,
            roles_granted: 0,
            failures: 0,
        }
    }

    /// Nothing needed repairing
    pub fn is_clean(&self) -> bool {
        self.removed == 0
            && self.reactions_removed == 0
            && self.user_reactions_removed == 0
            && self.roles_granted == 0
            && self.failures == 0
    }
}

/// Result of one verification step
enum Check<T> {
    Passed(T),
    /// Verification failed; the tracked message must go
    Failed(&'static str),
    /// A call errored; leave the tracked message as is
    Inconclusive,
}

/// Tracked message that passed verification
struct Verified {
    guild: Guild,
    message: Message,
    mapping: ReactionRoleMapping,
}

/// Reconciler service
pub struct Reconciler<'a> {
    ctx: &'a EngineContext,
}

impl<'a> Reconciler<'a> {
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Run one pass
    ///
    /// # Errors
    /// Only the schema check, schema creation and listing tracked messages
    /// are fatal; per-message failures are counted in the report.
    #[instrument(skip(self))]
    pub async fn run(&self) -> EngineResult<ReconcileReport> {
        let mut report = ReconcileReport::new();
        let repo = self.ctx.tracked_repo();

        if !self.ctx.schema_repo().has_schema().await? {
            info!("No schema found, creating tables");
            self.ctx.schema_repo().ensure_schema().await?;
            report.schema_created = true;
            report.finished_at = Utc::now();
            return Ok(report);
        }

        let tracked_messages = repo.list_all().await?;
        info!(count = tracked_messages.len(), "Reconciling tracked messages");

        for tracked in &tracked_messages {
            report.checked += 1;
            match self.verify(tracked).await {
                Check::Passed(verified) => self.resync(tracked, &verified, &mut report).await,
                Check::Failed(reason) => {
                    warn!(tracked_message_id = tracked.id, message_id = %tracked.platform_message_id, reason, "Removing stale tracked message");
                    match repo.cascade_delete(tracked.id).await {
                        Ok(_) => report.removed += 1,
                        Err(e) => {
                            warn!(tracked_message_id = tracked.id, error = %e, "Failed to remove stale tracked message");
                            report.failures += 1;
                        }
                    }
                }
                Check::Inconclusive => report.failures += 1,
            }
        }

        report.finished_at = Utc::now();
        info!(
            checked = report.checked,
            removed = report.removed,
            reactions_removed = report.reactions_removed,
            user_reactions_removed = report.user_reactions_removed,
            roles_granted = report.roles_granted,
            failures = report.failures,
            "Reconciliation finished"
        );
        Ok(report)
    }

    async fn verify(&self, tracked: &TrackedMessage) -> Check<Verified> {
        let (guild, message) = match self.verify_message(tracked).await {
            Check::Passed(found) => found,
            Check::Failed(reason) => return Check::Failed(reason),
            Check::Inconclusive => return Check::Inconclusive,
        };

        let repo = self.ctx.tracked_repo();
        let (emojis, roles) =
            match tokio::try_join!(repo.list_emojis(tracked.id), repo.list_roles(tracked.id)) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(tracked_message_id = tracked.id, error = %e, "Failed to load mapping");
                    return Check::Inconclusive;
                }
            };

        match self.verify_emojis(guild.id, &emojis).await {
            Check::Passed(()) => {}
            Check::Failed(reason) => return Check::Failed(reason),
            Check::Inconclusive => return Check::Inconclusive,
        }
        match self.verify_roles(guild.id, &roles).await {
            Check::Passed(()) => {}
            Check::Failed(reason) => return Check::Failed(reason),
            Check::Inconclusive => return Check::Inconclusive,
        }

        match ReactionRoleMapping::from_rows(&emojis, &roles) {
            Ok(mapping) => Check::Passed(Verified {
                guild,
                message,
                mapping,
            }),
            Err(_) => Check::Failed("corrupt mapping"),
        }
    }

    async fn verify_message(&self, tracked: &TrackedMessage) -> Check<(Guild, Message)> {
        let platform = self.ctx.platform();

        let guild = match platform.fetch_guild(tracked.guild_id).await {
            Ok(Some(guild)) => guild,
            Ok(None) => return Check::Failed("guild not found"),
            Err(e) => return inconclusive("guild", &e),
        };

        match platform.fetch_channel(tracked.channel_id).await {
            Ok(Some(channel)) if channel.is_text_in_guild(guild.id) => {}
            Ok(Some(_)) => return Check::Failed("channel is not a text channel of the guild"),
            Ok(None) => return Check::Failed("channel not found"),
            Err(e) => return inconclusive("channel", &e),
        }

        match platform
            .fetch_message(tracked.channel_id, tracked.platform_message_id)
            .await
        {
            Ok(Some(message)) => Check::Passed((guild, message)),
            Ok(None) => Check::Failed("message not found"),
            Err(e) => inconclusive("message", &e),
        }
    }

    async fn verify_emojis(&self, guild_id: Snowflake, emojis: &[TrackedEmoji]) -> Check<()> {
        for row in emojis {
            let Some(emoji) = Emoji::parse(&row.emoji) else {
                return Check::Failed("stored emoji does not parse");
            };
            let Some(emoji_id) = emoji.custom_id() else {
                continue;
            };
            match self.ctx.platform().fetch_emoji(guild_id, emoji_id).await {
                Ok(Some(_)) => {}
                Ok(None) => return Check::Failed("custom emoji not found"),
                Err(e) => return inconclusive("emoji", &e),
            }
        }
        Check::Passed(())
    }

    async fn verify_roles(&self, guild_id: Snowflake, roles: &[TrackedRole]) -> Check<()> {
        for row in roles {
            let Some(role_id) = mention::role_id_from_mention(&row.role) else {
                return Check::Failed("stored role mention does not decode");
            };
            match self.ctx.platform().fetch_role(guild_id, role_id).await {
                Ok(Some(_)) => {}
                Ok(None) => return Check::Failed("role not found"),
                Err(e) => return inconclusive("role", &e),
            }
        }
        Check::Passed(())
    }

    /// Align reactions and roles with the verified mapping
    async fn resync(&self, tracked: &TrackedMessage, verified: &Verified, report: &mut ReconcileReport) {
        let platform = self.ctx.platform();
        let channel_id = tracked.channel_id;
        let message_id = tracked.platform_message_id;

        for reaction in &verified.message.reactions {
            let Some(role_id) = verified
                .mapping
                .entry_for(&reaction.emoji)
                .and_then(|entry| entry.role_id())
            else {
                match platform.remove_reaction(channel_id, message_id, &reaction.emoji).await {
                    Ok(()) => {
                        debug!(tracked_message_id = tracked.id, emoji = %reaction.emoji, "Removed untracked reaction");
                        report.reactions_removed += 1;
                    }
                    Err(e) => {
                        warn!(tracked_message_id = tracked.id, emoji = %reaction.emoji, error = %e, "Failed to remove untracked reaction");
                        report.failures += 1;
                    }
                }
                continue;
            };

            let users = match platform
                .list_reaction_users(channel_id, message_id, &reaction.emoji)
                .await
            {
                Ok(users) => users,
                Err(e) => {
                    warn!(tracked_message_id = tracked.id, emoji = %reaction.emoji, error = %e, "Failed to list reaction users");
                    report.failures += 1;
                    continue;
                }
            };

            for user in &users {
                match platform.fetch_member(verified.guild.id, user.id).await {
                    Ok(Some(member)) if member.has_role(role_id) => {}
                    Ok(Some(member)) => {
                        match platform.grant_role(member.guild_id, member.user_id, role_id).await {
                            Ok(()) => {
                                debug!(user_id = %user.id, role_id = %role_id, "Granted role");
                                report.roles_granted += 1;
                            }
                            Err(e) => {
                                warn!(user_id = %user.id, role_id = %role_id, error = %e, "Failed to grant role");
                                report.failures += 1;
                            }
                        }
                    }
                    Ok(None) => {
                        match platform
                            .remove_user_reaction(channel_id, message_id, &reaction.emoji, user.id)
                            .await
                        {
                            Ok(()) => {
                                debug!(user_id = %user.id, "Removed reaction of departed user");
                                report.user_reactions_removed += 1;
                            }
                            Err(e) => {
                                warn!(user_id = %user.id, error = %e, "Failed to remove reaction of departed user");
                                report.failures += 1;
                            }
                        }
                    }
                    Err(e) => {
                        warn!(user_id = %user.id, error = %e, "Failed to fetch member");
                        report.failures += 1;
                    }
                }
            }
        }
    }
}

fn inconclusive<T>(what: &'static str, error: &rolebot_core::PlatformError) -> Check<T> {
    warn!(lookup = what, %error, "Platform lookup failed, keeping tracked message");
    Check::Inconclusive
}
