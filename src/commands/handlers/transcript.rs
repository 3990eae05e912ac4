use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;

pub(crate) fn handle_new(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let title = Some(invocation.args).filter(|t| !t.is_empty());
    app.new_session(title);
    CommandResult::Continue(format!("Started a new session: {}", app.session.title))
}

pub(crate) fn handle_clear(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.session.clear();
    CommandResult::Continue("Conversation cleared".to_string())
}

pub(crate) fn handle_title(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Continue(format!("Title: {}", app.session.title));
    }
    app.session.rename(invocation.args);
    CommandResult::Continue(format!("Title set to: {}", app.session.title))
}

pub(crate) fn handle_history(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.session.is_empty() {
        return CommandResult::Continue("No messages yet.".to_string());
    }

    let transcript = app
        .session
        .messages()
        .iter()
        .map(|message| format!("{}: {}", message.role.capitalized(), message.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    CommandResult::Continue(transcript)
}

pub(crate) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Exit
}
