//! `help` - list commands or describe one

use async_trait::async_trait;

use super::args::{ArgsError, OptionSpec, ParsedArgs};
use super::context::CommandContext;
use super::registry::{Command, CommandRegistry, CommandSpec};
use super::CommandResult;

const COMMAND_INDENT: usize = 2;
const MARGIN: usize = 25;

static SPEC: CommandSpec = CommandSpec {
    handles: &["h", "help"],
    description: "Prints all available commands or help for a specific command",
    usage: "help [-c|--command name]",
    options: &[OptionSpec {
        handles: &["-c", "--command"],
        description: "Get help for a command (used by default)",
        required: false,
        requires_arg: true,
    }],
    examples: &["help", "help -c ping", "help ping"],
};

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn spec(&self) -> &'static CommandSpec {
        &SPEC
    }

    async fn run(&self, ctx: &CommandContext<'_>, args: Result<ParsedArgs, ArgsError>) -> CommandResult {
        let args = match args {
            Ok(args) => args,
            Err(e) => {
                ctx.reply_error(&e.to_string()).await?;
                return Ok(());
            }
        };

        let wanted = args
            .get("c")
            .or_else(|| args.positional().first().map(String::as_str));

        let text = match wanted {
            Some(handle) => {
                let handle = handle.to_lowercase();
                match ctx.registry.get(&handle) {
                    Some(command) => command_help(command.spec(), COMMAND_INDENT, MARGIN),
                    None => format!("Command {handle} not found!"),
                }
            }
            None => command_list(ctx.registry, 0, MARGIN),
        };

        ctx.reply(&text).await?;
        Ok(())
    }
}

/// `left` indented by `indent`, `right` starting at column `margin` (at least one space apart)
fn pretty_concat(left: &str, right: &str, indent: usize, margin: usize) -> String {
    let width = left.chars().count();
    let padding = if margin > width { margin - width } else { 1 };
    format!("{}{left}{}{right}", " ".repeat(indent), " ".repeat(padding))
}

pub fn command_help(spec: &CommandSpec, indent: usize, margin: usize) -> String {
    let mut text = [
        "```asciidoc".to_string(),
        format!("== Help for command: '{}' ==", spec.handles.join(", ")),
        spec.description.to_string(),
        String::new(),
        "[usage]".to_string(),
        spec.usage.to_string(),
    ]
    .join("\n");

    if !spec.options.is_empty() {
        text.push_str("\n\n[options]\n");
        for option in spec.options {
            text.push_str(&pretty_concat(
                &option.handles.join(", "),
                &format!(":: {}", option.description),
                indent,
                margin,
            ));
            text.push('\n');
        }
    }

    if !spec.examples.is_empty() {
        text.push_str("\n[examples]\n");
        let examples: Vec<String> = spec
            .examples
            .iter()
            .map(|example| format!("{}{example}", " ".repeat(indent)))
            .collect();
        text.push_str(&examples.join("\n"));
    }

    text.push_str("```");
    text
}

pub fn command_list(registry: &CommandRegistry, indent: usize, margin: usize) -> String {
    if registry.is_empty() {
        return "No commands found!".to_string();
    }

    let mut text = "```asciidoc\n== List of available commands ==\n\n".to_string();
    for command in registry.commands() {
        let spec = command.spec();
        text.push_str(&pretty_concat(
            &format!("- {}", spec.handles.join(", ")),
            &format!(":: {}", spec.description),
            indent,
            margin,
        ));
        text.push('\n');
    }
    text.push_str("```");
    text
}
