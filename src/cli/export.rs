use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

use crate::core::config::data::path_display;
use crate::core::export::{load_snapshot, to_markdown, write_markdown};

/// Render a saved snapshot as Markdown, to `output` or to stdout.
pub fn export_snapshot(snapshot_path: &Path, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let snapshot = load_snapshot(snapshot_path)?;

    match output {
        Some(path) => {
            write_markdown(path, &snapshot.title, &snapshot.messages)?;
            eprintln!(
                "✅ Exported {} messages to {}",
                snapshot.messages.len(),
                path_display(path)
            );
        }
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(to_markdown(&snapshot.title, &snapshot.messages).as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::save_snapshot;
    use crate::utils::test_utils::create_test_messages;
    use tempfile::TempDir;

    #[test]
    fn snapshot_is_rendered_to_file() {
        let dir = TempDir::new().unwrap();
        let messages = create_test_messages();
        let snapshot = save_snapshot(dir.path(), "Weekly sync", &messages).unwrap();
        let target = dir.path().join("weekly.md");

        export_snapshot(&snapshot, Some(&target)).unwrap();

        let markdown = std::fs::read_to_string(&target).unwrap();
        assert_eq!(markdown, to_markdown("Weekly sync", &messages));
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = export_snapshot(&dir.path().join("absent.json"), None);
        assert!(result.is_err());
    }
}
