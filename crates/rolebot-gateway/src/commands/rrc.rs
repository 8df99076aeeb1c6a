//! `rrc` - create a reaction-role message

use async_trait::async_trait;
use rolebot_core::{mention, Permissions, Snowflake};
use rolebot_engine::{CreateTrackedMessage, CreationService, EngineError, ReactionRolePair};
use tracing::{debug, info, warn};

use super::args::{ArgsError, OptionSpec, ParsedArgs};
use super::context::{code_block, CommandContext};
use super::registry::{Command, CommandSpec};
use super::CommandResult;

static SPEC: CommandSpec = CommandSpec {
    handles: &["rrc", "react-role-create"],
    description: "Creates a message for the bot to track the reactions and give roles accordingly.",
    usage: "rrc -e emoji1,emoji2 -r role1,role2 [-d description1,description2] [-c channel] message",
    options: &[
        OptionSpec {
            handles: &["-e", "--emojis"],
            description: "The reaction emojis, separated by ','.",
            required: true,
            requires_arg: true,
        },
        OptionSpec {
            handles: &["-r", "--roles"],
            description: "The roles to assign for each reaction emoji, separated by ','.",
            required: true,
            requires_arg: true,
        },
        OptionSpec {
            handles: &["-d", "--description"],
            description: "Description to add after each role, separated by ','.",
            required: false,
            requires_arg: true,
        },
        OptionSpec {
            handles: &["-c", "--channel"],
            description: "The channel to post the reaction message in.",
            required: false,
            requires_arg: true,
        },
    ],
    examples: &[
        "rrc React to this message for some roles! -e emoji1,emoji2 -r role1,role2",
        "rrc React4Role! -e emoji1,emoji2 -r role1,role2 -d description1,description2 -c #yard",
    ],
};

pub struct ReactRoleCreateCommand;

/// Validated command input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrcInput {
    pub body: String,
    pub pairs: Vec<ReactionRolePair>,
    /// Raw `-c` value, resolved against the platform later
    pub channel: Option<String>,
}

/// Check the parsed arguments; `Err` carries the text to show the author
pub fn validate_args(args: &ParsedArgs) -> Result<RrcInput, String> {
    let split = |value: Option<&str>| value.map(|v| v.split(',').map(str::to_string).collect::<Vec<_>>());

    let emojis = split(args.get("e")).unwrap_or_default();
    let roles = split(args.get("r")).unwrap_or_default();
    let descriptions = split(args.get("d"));

    let counts_differ = emojis.len() != roles.len()
        || descriptions.as_ref().is_some_and(|d| d.len() != roles.len());
    if counts_differ {
        let descriptions = descriptions
            .as_ref()
            .map_or_else(|| "undefined".to_string(), |d| d.len().to_string());
        return Err(format!(
            "The number of emojis/roles/descriptions are different!\nNumber of emojis: {}; Number of roles: {}; Number of descriptions: {descriptions}",
            emojis.len(),
            roles.len(),
        ));
    }

    if let Some(role) = roles.iter().find(|role| !mention::is_role_mention(role)) {
        return Err(format!("Not a valid role mention '{role}' for argument -r"));
    }

    let mut descriptions = descriptions.map(Vec::into_iter);
    let pairs = emojis
        .into_iter()
        .zip(roles)
        .map(|(emoji, role)| ReactionRolePair {
            emoji,
            role,
            description: descriptions.as_mut().and_then(Iterator::next),
        })
        .collect();

    Ok(RrcInput {
        body: args.positional().join(" "),
        pairs,
        channel: args.get("c").map(str::to_string),
    })
}

impl ReactRoleCreateCommand {
    /// Guild owner or a member whose roles grant ADMINISTRATOR
    async fn is_administrator(ctx: &CommandContext<'_>, guild_id: Snowflake) -> CommandResult<bool> {
        let platform = ctx.engine.platform();
        let author_id = ctx.message.author.id;

        if let Some(guild) = platform.fetch_guild(guild_id).await? {
            if guild.is_owner(author_id) {
                return Ok(true);
            }
        }
        let Some(member) = platform.fetch_member(guild_id, author_id).await? else {
            return Ok(false);
        };

        let mut permissions = Vec::new();
        for role_id in member.effective_role_ids() {
            if let Some(role) = platform.fetch_role(guild_id, role_id).await? {
                permissions.push(role.permissions);
            }
        }
        Ok(Permissions::combine(permissions).contains(Permissions::ADMINISTRATOR))
    }

    /// Target channel from `-c`, or the invoking channel
    async fn resolve_channel(
        ctx: &CommandContext<'_>,
        guild_id: Snowflake,
        channel: Option<&str>,
    ) -> CommandResult<Result<Snowflake, String>> {
        let Some(raw) = channel else {
            return Ok(Ok(ctx.message.channel_id));
        };
        let Some(channel_id) = mention::channel_id_from_mention(raw) else {
            return Ok(Err(format!("Not a valid channel mention '{raw}' for argument -c")));
        };

        match ctx.engine.platform().fetch_channel(channel_id).await? {
            None => Ok(Err(format!("Channel '{raw}' not found"))),
            Some(channel) if !channel.is_text_in_guild(guild_id) => {
                Ok(Err(format!("Channel '{raw}' must be a text channel")))
            }
            Some(channel) => Ok(Ok(channel.id)),
        }
    }
}

#[async_trait]
impl Command for ReactRoleCreateCommand {
    fn spec(&self) -> &'static CommandSpec {
        &SPEC
    }

    async fn run(&self, ctx: &CommandContext<'_>, args: Result<ParsedArgs, ArgsError>) -> CommandResult {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let author_id = ctx.message.author.id;

        if !Self::is_administrator(ctx, guild_id).await? {
            warn!(author_id = %author_id, "rrc refused: author is not an administrator");
            ctx.reply_error("You don't have permission to execute this command!").await?;
            return Ok(());
        }

        let input = match args.map_err(|e| e.to_string()).and_then(|args| validate_args(&args)) {
            Ok(input) => input,
            Err(message) => {
                debug!(author_id = %author_id, error = %message, "rrc rejected");
                ctx.reply_error(&message).await?;
                return Ok(());
            }
        };

        let channel_id = match Self::resolve_channel(ctx, guild_id, input.channel.as_deref()).await? {
            Ok(channel_id) => channel_id,
            Err(message) => {
                debug!(author_id = %author_id, error = %message, "rrc rejected");
                ctx.reply_error(&message).await?;
                return Ok(());
            }
        };

        let request = CreateTrackedMessage {
            guild_id,
            channel_id,
            body: input.body,
            pairs: input.pairs,
        };

        match CreationService::new(ctx.engine).create(request).await {
            Ok(created) => {
                info!(
                    author_id = %author_id,
                    tracked_message_id = created.tracked_message_id,
                    message_id = %created.message.id,
                    channel_id = %channel_id,
                    "rrc message created"
                );
            }
            Err(EngineError::Validation(message)) => {
                ctx.reply_error(&message).await?;
            }
            Err(e) => {
                warn!(author_id = %author_id, error = %e, code = e.error_code(), "rrc failed");
                ctx.reply(&code_block(&e.user_message())).await?;
            }
        }
        Ok(())
    }
}
