//! `ping` - liveness check

use async_trait::async_trait;
use chrono::Utc;

use super::args::{ArgsError, ParsedArgs};
use super::context::CommandContext;
use super::registry::{Command, CommandSpec};
use super::CommandResult;

static SPEC: CommandSpec = CommandSpec {
    handles: &["p", "ping"],
    description: "Ping the platform.",
    usage: "ping",
    options: &[],
    examples: &[],
};

pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    fn spec(&self) -> &'static CommandSpec {
        &SPEC
    }

    async fn run(&self, ctx: &CommandContext<'_>, _: Result<ParsedArgs, ArgsError>) -> CommandResult {
        // Time since the platform stamped the invoking message
        let latency = (Utc::now().timestamp_millis() - ctx.message.id.timestamp()).max(0);
        ctx.reply(&format!("{latency} ms pong!")).await?;
        Ok(())
    }
}
