//! The seam between the interaction loop and the two model backends.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local model server with streaming replies.
    #[default]
    Local,
    /// Hosted API with a single blocking call.
    Hosted,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Hosted => "hosted",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" | "ollama" => Ok(BackendKind::Local),
            "hosted" | "openai" => Ok(BackendKind::Hosted),
            other => Err(format!(
                "unknown backend '{other}' (expected 'local' or 'hosted')"
            )),
        }
    }
}

/// Failures talking to a backend. None of them are retried.
#[derive(Debug)]
pub enum BackendError {
    /// Connection, timeout, or body read failure.
    Transport(reqwest::Error),
    /// The server answered with a non-success status.
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The server reported an error inside an otherwise valid response.
    Api(String),
    /// The response could not be understood.
    Malformed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "{err}"),
            BackendError::Status { status, body } => {
                write!(f, "HTTP {status}\n{}", format_api_error(body))
            }
            BackendError::Api(message) => write!(f, "API Error: {message}"),
            BackendError::Malformed(message) => write!(f, "Malformed response: {message}"),
        }
    }
}

impl StdError for BackendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BackendError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err)
    }
}

/// A language-model backend as seen by the interaction loop.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Produce a complete reply. Streaming backends forward every fragment to
    /// `on_fragment` as it arrives; blocking backends call it once.
    async fn reply(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
        on_fragment: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, BackendError>;

    /// Text shown as the assistant's turn when `reply` fails.
    fn failure_message(&self, err: &BackendError) -> String {
        err.to_string()
    }

    /// Models the backend can serve; empty when unknown.
    async fn list_models(&self) -> Vec<String> {
        Vec::new()
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Render an error body for display, pretty-printing JSON and fencing it.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            if let Some(summary) = extract_error_summary(&json_value).filter(|s| !s.is_empty()) {
                return format!("API Error: {}\n```json\n{}\n```", summary, pretty_json);
            }
            return format!("API Error:\n```json\n{}\n```", pretty_json);
        }
    }

    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        format!("API Error:\n```xml\n{}\n```", trimmed)
    } else {
        format!("API Error:\n```\n{}\n```", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parses_aliases() {
        assert_eq!("local".parse::<BackendKind>(), Ok(BackendKind::Local));
        assert_eq!(" Ollama ".parse::<BackendKind>(), Ok(BackendKind::Local));
        assert_eq!("HOSTED".parse::<BackendKind>(), Ok(BackendKind::Hosted));
        assert!("cloud".parse::<BackendKind>().is_err());
    }

    #[test]
    fn format_api_error_prettifies_json_with_summary() {
        let raw = r#"{"error":{"message":"model overloaded","type":"server_error"}}"#;
        let expected = r#"API Error: model overloaded
```json
{
  "error": {
    "message": "model overloaded",
    "type": "server_error"
  }
}
```"#;
        assert_eq!(format_api_error(raw), expected);
    }

    #[test]
    fn format_api_error_reads_string_error_field() {
        let formatted = format_api_error(r#"{"error":"model 'x' not found"}"#);
        assert!(formatted.starts_with("API Error: model 'x' not found\n```json\n"));
    }

    #[test]
    fn format_api_error_handles_xml_plaintext_and_empty() {
        assert_eq!(
            format_api_error("<error>bad</error>"),
            "API Error:\n```xml\n<error>bad</error>\n```"
        );
        assert_eq!(
            format_api_error("api failure"),
            "API Error:\n```\napi failure\n```"
        );
        assert_eq!(format_api_error("  "), "API Error:\n```\n<empty>\n```");
    }

    #[test]
    fn status_errors_include_code_and_body() {
        let err = BackendError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "no such model".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("HTTP 404 Not Found"));
        assert!(text.contains("no such model"));
    }
}
