use serde::{Deserialize, Serialize};

/// A single role/content pair as both backends expect it on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct ChatOptions {
    pub temperature: f32,
}

/// Body of `POST /api/chat` on the local server.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub options: ChatOptions,
    pub stream: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct ChatChunkMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// One line of the local server's newline-delimited response.
#[derive(Debug, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChatChunkMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of the hosted single-shot call.
#[derive(Debug, Serialize)]
pub struct HostedRequest {
    pub model: String,
    pub input: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct HostedResponse {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Vec<HostedOutputItem>,
}

#[derive(Debug, Deserialize)]
pub struct HostedOutputItem {
    #[serde(default)]
    pub content: Vec<HostedContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct HostedContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl HostedResponse {
    /// The reply text: `output_text` when the provider supplies it, otherwise
    /// every `output_text` part in order.
    pub fn text(&self) -> Option<String> {
        if let Some(text) = &self.output_text {
            return Some(text.clone());
        }

        let parts: Vec<&str> = self
            .output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Response of `GET /api/tags`.
#[derive(Debug, Deserialize, Default)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

pub mod models;
