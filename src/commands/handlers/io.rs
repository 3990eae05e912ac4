use std::path::Path;

use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;
use crate::core::config::data::path_display;

const EMPTY_SESSION_HINT: &str = "Nothing to export yet. Start chatting first.";

pub(crate) fn handle_export(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if app.session.is_empty() {
        return CommandResult::Continue(EMPTY_SESSION_HINT.to_string());
    }

    let target = Some(invocation.args)
        .filter(|arg| !arg.is_empty())
        .map(Path::new);

    match app.export(target) {
        Ok(report) => {
            let mut status = format!("Exported to {}", path_display(&report.markdown));
            if let Some(snapshot) = report.snapshot {
                status.push_str(&format!("\nSnapshot saved to {}", path_display(snapshot)));
            }
            CommandResult::Continue(status)
        }
        Err(e) => CommandResult::Continue(format!("Export error: {e}")),
    }
}

pub(crate) fn handle_save(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.session.is_empty() {
        return CommandResult::Continue(EMPTY_SESSION_HINT.to_string());
    }

    match app.save_snapshot() {
        Ok(path) => CommandResult::Continue(format!("Saved to {}", path_display(path))),
        Err(e) => CommandResult::Continue(format!("Save error: {e}")),
    }
}
