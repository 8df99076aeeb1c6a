//! Per-invocation command context

use rolebot_core::{Message, MessageCreateEvent, PlatformResult, Snowflake};
use rolebot_engine::EngineContext;

use super::registry::CommandRegistry;

/// Everything a command can reach while running
pub struct CommandContext<'a> {
    pub engine: &'a EngineContext,
    pub registry: &'a CommandRegistry,
    pub message: &'a MessageCreateEvent,
    /// Lowercase handle the command was invoked with
    pub handle: &'a str,
    pub prefix: &'a str,
}

impl CommandContext<'_> {
    /// Guild of the invoking message; intake only runs commands inside guilds
    pub fn guild_id(&self) -> Option<Snowflake> {
        self.message.guild_id
    }

    /// Reply in the invoking channel, mentioning the author
    pub async fn reply(&self, text: &str) -> PlatformResult<Message> {
        let content = format!("<@{}>, {text}", self.message.author.id);
        self.engine
            .platform()
            .send_message(self.message.channel_id, &content)
            .await
    }

    /// Reply `Error: ```text```` for input problems
    pub async fn reply_error(&self, text: &str) -> PlatformResult<Message> {
        self.reply(&format!("Error: {}", code_block(text))).await
    }
}

/// Wrap text in a code block
pub fn code_block(text: &str) -> String {
    format!("```{text}```")
}
