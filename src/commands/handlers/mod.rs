pub(super) mod io;
pub(super) mod selection;
pub(super) mod transcript;

use crate::commands::CommandResult;

pub(super) fn usage_status(usage: &'static str) -> CommandResult {
    CommandResult::Continue(usage.to_string())
}
