use chrono::{DateTime, Local};

use crate::core::message::Message;

pub const DEFAULT_SESSION_TITLE: &str = "Nova Session";

/// One conversation: an append-only, chronologically ordered message list.
///
/// The system prompt is never stored here; it is attached per call by
/// [`crate::core::preset::assemble_messages`].
#[derive(Debug, Clone)]
pub struct Session {
    pub title: String,
    pub created_at: DateTime<Local>,
    messages: Vec<Message>,
}

impl Session {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created_at: Local::now(),
            messages: Vec::new(),
        }
    }

    /// Rebuild a session from persisted parts (e.g. a loaded snapshot).
    pub fn restore(title: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            title: title.into(),
            created_at: Local::now(),
            messages,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop all messages but keep the title and creation time.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TITLE)
    }
}
