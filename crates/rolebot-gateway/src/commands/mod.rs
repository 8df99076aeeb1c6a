//! Operator commands
//!
//! Messages starting with the configured prefix are parsed into a handle and
//! arguments and run against the engine.

mod args;
mod context;
mod help;
mod intake;
mod ping;
mod registry;
mod rrc;

pub use args::{parse, split_words, ArgsError, OptionSpec, ParsedArgs};
pub use context::{code_block, CommandContext};
pub use help::{command_help, command_list, HelpCommand};
pub use intake::{CommandHandler, IntakeOutcome};
pub use ping::PingCommand;
pub use registry::{Command, CommandRegistry, CommandSpec};
pub use rrc::{validate_args, ReactRoleCreateCommand, RrcInput};

use rolebot_core::PlatformError;
use rolebot_engine::EngineError;

/// Failure that aborts a command; reported back to the author
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type CommandResult<T = ()> = Result<T, CommandError>;
