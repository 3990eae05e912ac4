//! Markdown export and JSON snapshots of a session.
//!
//! Snapshots are whole-file writes; each save produces a new file whose name
//! carries a second-granularity timestamp, so earlier saves are never
//! overwritten (two saves within the same second collide, which is accepted).

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::data::path_display;
use crate::core::message::Message;
use crate::core::session::DEFAULT_SESSION_TITLE;

const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug)]
pub enum ExportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io { path, source } => {
                write!(f, "Failed to access {}: {}", path_display(path), source)
            }
            ExportError::Json { path, source } => {
                write!(f, "Invalid snapshot {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for ExportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            ExportError::Json { source, .. } => Some(source),
        }
    }
}

/// On-disk form of a saved session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub title: String,
    pub saved_at: DateTime<Local>,
    pub messages: Vec<Message>,
}

/// Render a conversation as Markdown: a `#` title, then one `##` section per
/// message with the role capitalized and the trimmed content after a single
/// blank line.
pub fn to_markdown(title: &str, messages: &[Message]) -> String {
    let mut out = vec![format!("# {title}"), String::new()];
    for message in messages {
        out.push(format!(
            "## {}\n\n{}\n",
            message.role.capitalized(),
            message.content.trim()
        ));
    }
    format!("{}\n", out.join("\n").trim())
}

/// Reduce a title to a filesystem-safe token. Alphanumerics, spaces, `-` and
/// `_` survive; everything else becomes `_`. A result with no alphanumeric
/// character falls back to the default session title.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = replaced.trim();

    if trimmed.chars().any(char::is_alphanumeric) {
        trimmed.to_string()
    } else {
        DEFAULT_SESSION_TITLE.to_string()
    }
}

/// File name offered for a Markdown download of the session.
pub fn markdown_filename(title: &str) -> String {
    format!("{}.md", sanitize_title(title).replace(' ', "_"))
}

pub fn snapshot_filename(title: &str, saved_at: &DateTime<Local>) -> String {
    format!(
        "{}_{}.json",
        sanitize_title(title),
        saved_at.format(SNAPSHOT_TIMESTAMP_FORMAT)
    )
}

/// Write a full JSON snapshot into `dir` and return the file written.
pub fn save_snapshot(
    dir: &Path,
    title: &str,
    messages: &[Message],
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let saved_at = Local::now();
    let path = dir.join(snapshot_filename(title, &saved_at));
    let snapshot = Snapshot {
        title: title.to_string(),
        saved_at,
        messages: messages.to_vec(),
    };

    let contents = serde_json::to_string_pretty(&snapshot).map_err(|source| ExportError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, contents).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), messages = messages.len(), "Saved session snapshot");
    Ok(path)
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, ExportError> {
    let contents = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_markdown(path: &Path, title: &str, messages: &[Message]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, to_markdown(title, messages)).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_messages;
    use tempfile::TempDir;

    #[test]
    fn markdown_has_one_heading_per_message_in_order() {
        let messages = create_test_messages();
        let markdown = to_markdown("Chat", &messages);

        let headings: Vec<&str> = markdown
            .lines()
            .filter(|line| line.starts_with("## "))
            .collect();
        assert_eq!(
            headings,
            vec!["## User", "## Assistant", "## User", "## Assistant"]
        );
        assert_eq!(
            markdown,
            "# Chat\n\n## User\n\nHello\n\n## Assistant\n\nHi there!\n\n## User\n\nHow are you?\n\n## Assistant\n\nI'm doing well, thank you for asking!\n"
        );
    }

    #[test]
    fn markdown_content_follows_exactly_one_blank_line() {
        let messages = vec![
            Message::user("\n\n  padded question  \n"),
            Message::assistant("multi\nline"),
        ];
        let markdown = to_markdown("T", &messages);
        let lines: Vec<&str> = markdown.lines().collect();

        for (index, line) in lines.iter().enumerate() {
            if line.starts_with("## ") {
                assert_eq!(lines[index + 1], "");
                assert!(!lines[index + 2].is_empty(), "content missing after {line}");
            }
        }
        assert!(markdown.contains("## User\n\npadded question\n"));
        assert!(markdown.ends_with("multi\nline\n"));
    }

    #[test]
    fn markdown_of_empty_conversation_is_title_only() {
        assert_eq!(to_markdown("Empty", &[]), "# Empty\n");
    }

    #[test]
    fn sanitize_title_replaces_disallowed_characters() {
        assert_eq!(sanitize_title("Plan: Q3/Q4?"), "Plan_ Q3_Q4_");
        assert_eq!(sanitize_title("  my-notes_v2  "), "my-notes_v2");
        assert_eq!(sanitize_title("Café déjà"), "Café déjà");
    }

    #[test]
    fn sanitize_title_falls_back_when_nothing_usable_remains() {
        for title in ["!!!", "", "   ", "/\\:*", "-_-"] {
            assert_eq!(sanitize_title(title), DEFAULT_SESSION_TITLE, "title={title:?}");
        }
    }

    #[test]
    fn markdown_filename_uses_underscores() {
        assert_eq!(markdown_filename("Nova Session"), "Nova_Session.md");
        assert_eq!(markdown_filename("???"), "Nova_Session.md");
    }

    #[test]
    fn snapshot_round_trips_title_and_messages() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let messages = create_test_messages();
        let started = Local::now();

        let path = save_snapshot(temp_dir.path(), "Plan: launch!", &messages)
            .expect("Failed to save snapshot");

        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("Plan_ launch__"), "{file_name}");
        assert!(file_name.ends_with(".json"));

        let loaded = load_snapshot(&path).expect("Failed to load snapshot");
        assert_eq!(loaded.title, "Plan: launch!");
        assert_eq!(loaded.messages, messages);
        assert!(loaded.saved_at >= started);
    }

    #[test]
    fn snapshot_document_has_expected_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = save_snapshot(temp_dir.path(), "!!!", &[Message::user("hi")]).unwrap();

        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("Nova Session_"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["title"], "!!!");
        assert!(raw["saved_at"].as_str().unwrap().contains('T'));
        assert_eq!(
            raw["messages"],
            serde_json::json!([{"role": "user", "content": "hi"}])
        );
    }

    #[test]
    fn save_snapshot_creates_missing_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("a").join("b");
        let path = save_snapshot(&nested, "x", &[]).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn load_snapshot_reports_invalid_json() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, ExportError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn write_markdown_writes_rendered_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("out").join("chat.md");
        write_markdown(&path, "Chat", &[Message::user("hi")]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Chat\n\n## User\n\nhi\n"
        );
    }
}
