//! Command trait and registry
//!
//! The registry is built once at startup and shared by reference; handles
//! are stored lowercase and the first command to claim a handle keeps it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::args::{OptionSpec, ParsedArgs};
use super::context::CommandContext;
use super::CommandResult;

/// Static description of a command, also used for help output
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub handles: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub options: &'static [OptionSpec],
    pub examples: &'static [&'static str],
}

#[async_trait]
pub trait Command: Send + Sync {
    fn spec(&self) -> &'static CommandSpec;

    /// `args` is the parse result; commands decide how to report parse errors
    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: Result<ParsedArgs, super::args::ArgsError>,
    ) -> CommandResult;
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
    handles: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in commands
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::ping::PingCommand));
        registry.register(Arc::new(super::help::HelpCommand));
        registry.register(Arc::new(super::rrc::ReactRoleCreateCommand));
        registry
    }

    /// Register a command under each of its handles
    ///
    /// Returns `false` when every handle was already taken.
    pub fn register(&mut self, command: Arc<dyn Command>) -> bool {
        let index = self.commands.len();
        let mut claimed = false;

        for handle in command.spec().handles {
            let handle = handle.to_lowercase();
            if self.handles.contains_key(&handle) {
                warn!(handle = %handle, "Command handle already registered, skipping");
                continue;
            }
            self.handles.insert(handle, index);
            claimed = true;
        }

        if claimed {
            self.commands.push(command);
        }
        claimed
    }

    /// Look up by handle, case-insensitive
    pub fn get(&self, handle: &str) -> Option<&Arc<dyn Command>> {
        self.handles
            .get(&handle.to_lowercase())
            .and_then(|&index| self.commands.get(index))
    }

    /// Commands in registration order
    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut handles: Vec<_> = self.handles.keys().collect();
        handles.sort();
        f.debug_struct("CommandRegistry")
            .field("handles", &handles)
            .finish()
    }
}
