//! One turn of the interaction loop.

use tracing::{debug, warn};

use crate::core::backend::ChatBackend;
use crate::core::message::Message;
use crate::core::preset::{assemble_messages, Preset};
use crate::core::session::Session;

/// Per-turn selections; any of them may change between turns.
#[derive(Debug, Clone, Copy)]
pub struct TurnParams<'a> {
    pub model: &'a str,
    pub preset: &'a Preset,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; the session was not touched.
    Skipped,
    Replied(String),
    /// The backend failed; the text stands in for the assistant message.
    Failed(String),
}

/// Append the user's input, call the backend with `[system] + history`, and
/// append the reply. A failed call appends a readable error in place of the
/// reply, so every non-blank turn grows the session by exactly two messages.
pub async fn run_turn(
    session: &mut Session,
    backend: &dyn ChatBackend,
    params: TurnParams<'_>,
    input: &str,
    on_fragment: &mut (dyn for<'s> FnMut(&'s str) + Send),
) -> TurnOutcome {
    if input.trim().is_empty() {
        return TurnOutcome::Skipped;
    }

    session.push(Message::user(input));
    let messages = assemble_messages(params.preset, session.messages());
    debug!(
        backend = %backend.kind(),
        model = params.model,
        preset = %params.preset.id,
        messages = messages.len(),
        "Sending turn"
    );

    match backend
        .reply(params.model, messages, params.temperature, on_fragment)
        .await
    {
        Ok(reply) => {
            session.push(Message::assistant(reply.clone()));
            TurnOutcome::Replied(reply)
        }
        Err(err) => {
            warn!(error = %err, "Backend call failed");
            let mut text = backend.failure_message(&err);
            if text.trim().is_empty() {
                text = format!("⚠️ The {} backend failed without details.", backend.kind());
            }
            session.push(Message::assistant(text.clone()));
            TurnOutcome::Failed(text)
        }
    }
}
