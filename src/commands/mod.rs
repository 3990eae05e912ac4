mod handlers;
mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

use crate::core::app::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The command was handled; `output` (possibly empty) is shown to the user.
    Continue(String),
    /// Not a command; send the text to the backend.
    ProcessAsMessage(String),
    /// Ask the backend for its models, which needs the async runtime.
    ListModels,
    Exit,
}

/// Route one line of REPL input. Lines starting with `/` are commands and
/// never reach the backend, even when the command is unknown.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        let message = input.trim_end_matches(['\r', '\n']);
        return CommandResult::ProcessAsMessage(message.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = parts.next().unwrap_or_default();
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            (command.handler)(app, CommandInvocation { args })
        }
        None => CommandResult::Continue(format!(
            "Unknown command '{trimmed}'. Type /help to see what Nova understands."
        )),
    }
}

pub(super) fn handle_help(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Type a message and press Enter to chat.\n\nCommands:\n");
    for command in all_commands() {
        for usage in command.usages {
            help.push_str(&format!("  {:<24} {}\n", usage.syntax, usage.description));
        }
    }
    CommandResult::Continue(help.trim_end().to_string())
}
