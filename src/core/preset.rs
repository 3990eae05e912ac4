use serde::{Deserialize, Serialize};

use crate::api::ChatMessage;
use crate::core::builtin_presets::load_builtin_presets;
use crate::core::message::{Message, Role};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Short handle typed on the command line (`/preset finance`).
    pub id: String,
    /// Human-readable mode name.
    pub name: String,
    pub system_prompt: String,
}

impl Preset {
    pub fn system_message(&self) -> ChatMessage {
        ChatMessage::new(Role::System.as_str(), self.system_prompt.trim())
    }
}

/// Fixed name -> system prompt table, loaded once at startup.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<Preset>,
}

impl PresetRegistry {
    pub fn builtin() -> Self {
        Self::from_presets(load_builtin_presets())
    }

    pub fn from_presets(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    pub fn list(&self) -> &[Preset] {
        &self.presets
    }

    pub fn default_preset(&self) -> Option<&Preset> {
        self.presets.first()
    }

    /// Look a preset up by id or display name, ignoring ASCII case.
    pub fn find(&self, key: &str) -> Option<&Preset> {
        let key = key.trim();
        self.presets
            .iter()
            .find(|preset| preset.id.eq_ignore_ascii_case(key))
            .or_else(|| {
                self.presets
                    .iter()
                    .find(|preset| preset.name.eq_ignore_ascii_case(key))
            })
    }

    /// Resolve a requested preset, falling back to the default when none was
    /// requested. An explicit but unknown name is an error.
    pub fn resolve(&self, requested: Option<&str>) -> Result<&Preset, String> {
        match requested {
            Some(key) if !key.trim().is_empty() => self.find(key).ok_or_else(|| {
                let available: Vec<&str> =
                    self.presets.iter().map(|preset| preset.id.as_str()).collect();
                format!(
                    "Preset '{}' not found. Available presets: {}",
                    key,
                    available.join(", ")
                )
            }),
            _ => self
                .default_preset()
                .ok_or_else(|| "No presets are available".to_string()),
        }
    }
}

/// Build the payload for a backend call: the preset's system message followed
/// by the whole history in order. Nothing is added to or removed from the
/// history itself.
pub fn assemble_messages(preset: &Preset, history: &[Message]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(preset.system_message());
    messages.extend(history.iter().map(Message::to_chat_message));
    messages
}
