use super::handlers::{io, selection, transcript};
use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usages: &'static [CommandUsage],
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.split_whitespace().nth(index)
    }

    pub fn args_len(&self) -> usize {
        self.args.split_whitespace().count()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands().iter().find(|command| {
        command.name.eq_ignore_ascii_case(name)
            || command
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    })
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/help",
            description: "Show available commands.",
        }],
        handler: super::handle_help,
    },
    Command {
        name: "new",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/new [title]",
            description: "Start a new, empty session.",
        }],
        handler: transcript::handle_new,
    },
    Command {
        name: "clear",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/clear",
            description: "Remove all messages but keep the title.",
        }],
        handler: transcript::handle_clear,
    },
    Command {
        name: "title",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/title [text]",
            description: "Show or change the session title.",
        }],
        handler: transcript::handle_title,
    },
    Command {
        name: "history",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/history",
            description: "Print the conversation so far.",
        }],
        handler: transcript::handle_history,
    },
    Command {
        name: "preset",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/preset [name]",
            description: "Show or switch the system prompt preset.",
        }],
        handler: selection::handle_preset,
    },
    Command {
        name: "presets",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/presets",
            description: "List the available presets.",
        }],
        handler: selection::handle_presets,
    },
    Command {
        name: "model",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/model [name]",
            description: "Show or switch the model used for the next turn.",
        }],
        handler: selection::handle_model,
    },
    Command {
        name: "models",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/models",
            description: "List models reported by the backend.",
        }],
        handler: selection::handle_models,
    },
    Command {
        name: "temperature",
        aliases: &["temp"],
        usages: &[CommandUsage {
            syntax: "/temperature [0.0-1.0]",
            description: "Show or set the sampling temperature.",
        }],
        handler: selection::handle_temperature,
    },
    Command {
        name: "export",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/export [file]",
            description: "Write the conversation as Markdown.",
        }],
        handler: io::handle_export,
    },
    Command {
        name: "save",
        aliases: &[],
        usages: &[CommandUsage {
            syntax: "/save",
            description: "Save a JSON snapshot to the sessions directory.",
        }],
        handler: io::handle_save,
    },
    Command {
        name: "quit",
        aliases: &["exit"],
        usages: &[CommandUsage {
            syntax: "/quit",
            description: "Leave Nova.",
        }],
        handler: transcript::handle_quit,
    },
];
