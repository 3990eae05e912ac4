use crate::core::config::data::{path_display, Config};

fn or_unset<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(unset)".to_string())
}

fn secret(value: &Option<String>) -> &'static str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => "(set)",
        _ => "(unset)",
    }
}

impl Config {
    /// Lines shown by `nova config show`. Secrets are never printed.
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            format!("  backend: {}", or_unset(self.backend)),
            format!("  base-url: {}", or_unset(self.base_url.as_deref())),
            format!("  default-model: {}", or_unset(self.default_model.as_deref())),
            format!(
                "  hosted-base-url: {}",
                or_unset(self.hosted_base_url.as_deref())
            ),
            format!("  hosted-model: {}", or_unset(self.hosted_model.as_deref())),
            format!("  api-key: {}", secret(&self.api_key)),
            format!("  access-code: {}", secret(&self.access_code)),
            format!(
                "  default-preset: {}",
                or_unset(self.default_preset.as_deref())
            ),
            format!("  temperature: {}", or_unset(self.temperature)),
            match self.autosave.unwrap_or(true) {
                true => "  autosave: on".to_string(),
                false => "  autosave: off".to_string(),
            },
            format!(
                "  sessions-dir: {}",
                or_unset(self.sessions_dir.as_ref().map(path_display))
            ),
            format!(
                "  request-timeout: {}",
                or_unset(self.request_timeout_secs.map(|secs| format!("{secs}s")))
            ),
        ]
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.display_lines() {
            println!("{line}");
        }
    }
}
