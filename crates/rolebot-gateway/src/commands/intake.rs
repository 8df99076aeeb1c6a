//! Command intake - turn MESSAGE_CREATE events into command runs

use std::sync::Arc;

use rolebot_core::MessageCreateEvent;
use rolebot_engine::EngineContext;
use tracing::{debug, error, instrument, warn};

use super::args::{parse, split_words};
use super::context::{code_block, CommandContext};
use super::registry::CommandRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Bot author, DM, or no prefix
    Ignored,
    UnknownCommand,
    Executed { handle: String },
    Failed { handle: String },
}

pub struct CommandHandler {
    registry: Arc<CommandRegistry>,
    prefix: String,
}

impl CommandHandler {
    pub fn new(registry: Arc<CommandRegistry>, prefix: impl Into<String>) -> Self {
        Self {
            registry,
            prefix: prefix.into(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Content after the prefix, `None` if the message doesn't start with it
    fn strip_prefix<'c>(&self, content: &'c str) -> Option<&'c str> {
        let head = content.get(..self.prefix.len())?;
        if head.to_lowercase() != self.prefix.to_lowercase() {
            return None;
        }
        content.get(self.prefix.len()..)
    }

    #[instrument(skip(self, engine, message), fields(message_id = %message.id, author_id = %message.author.id))]
    pub async fn handle(&self, engine: &EngineContext, message: &MessageCreateEvent) -> IntakeOutcome {
        if message.author.bot || message.guild_id.is_none() {
            return IntakeOutcome::Ignored;
        }
        let Some(rest) = self.strip_prefix(&message.content) else {
            return IntakeOutcome::Ignored;
        };

        let mut words = split_words(rest);
        if words.is_empty() {
            return IntakeOutcome::Ignored;
        }
        let handle = words.remove(0).to_lowercase();
        let Some(command) = self.registry.get(&handle) else {
            return IntakeOutcome::UnknownCommand;
        };

        let args = parse(command.spec().options, &words);
        let ctx = CommandContext {
            engine,
            registry: &self.registry,
            message,
            handle: &handle,
            prefix: &self.prefix,
        };

        debug!(handle = %handle, "Running command");
        match command.run(&ctx, args).await {
            Ok(()) => IntakeOutcome::Executed { handle },
            Err(e) => {
                error!(handle = %handle, error = %e, "Error processing command");
                let reply = format!("Error processing command '{handle}'. {}", code_block(&e.to_string()));
                if let Err(e) = ctx.reply(&reply).await {
                    warn!(error = %e, "Failed to report command error");
                }
                IntakeOutcome::Failed { handle }
            }
        }
    }
}
