use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::backend::BackendKind;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_HOSTED_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOSTED_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Keys accepted by `nova config set` / `nova config unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "backend",
    "base-url",
    "default-model",
    "hosted-base-url",
    "hosted-model",
    "default-preset",
    "temperature",
    "sessions-dir",
    "autosave",
    "request-timeout",
];

/// Contents of `config.toml`. Every field is optional; unset fields fall
/// back to environment variables and then to built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which backend a chat talks to ("local" or "hosted")
    pub backend: Option<BackendKind>,
    /// Base URL of the local model server
    pub base_url: Option<String>,
    /// Model used when the local server's list does not decide otherwise
    pub default_model: Option<String>,
    pub hosted_base_url: Option<String>,
    pub hosted_model: Option<String>,
    /// API key for the hosted backend
    pub api_key: Option<String>,
    /// Shared secret required before the hosted chat accepts input
    pub access_code: Option<String>,
    /// Preset id or name selected at startup
    pub default_preset: Option<String>,
    pub temperature: Option<f32>,
    /// Write a JSON snapshot whenever the conversation is exported
    pub autosave: Option<bool>,
    pub sessions_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

pub fn validate_temperature(value: f32) -> Result<f32, String> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be between 0.0 and 1.0, got {value}"))
    }
}

pub fn validate_request_timeout(secs: u64) -> Result<u64, String> {
    if secs == 0 {
        Err("request-timeout must be at least 1 second".to_string())
    } else {
        Ok(secs)
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected on/off, got '{other}'")),
    }
}

impl Config {
    /// Apply `nova config set <key> <value>`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("a value is required for '{key}'"));
        }

        match key {
            "backend" => self.backend = Some(value.parse::<BackendKind>()?),
            "base-url" => self.base_url = Some(value.to_string()),
            "default-model" => self.default_model = Some(value.to_string()),
            "hosted-base-url" => self.hosted_base_url = Some(value.to_string()),
            "hosted-model" => self.hosted_model = Some(value.to_string()),
            "default-preset" => self.default_preset = Some(value.to_string()),
            "temperature" => {
                let parsed: f32 = value
                    .parse()
                    .map_err(|_| format!("'{value}' is not a number"))?;
                self.temperature = Some(validate_temperature(parsed)?);
            }
            "sessions-dir" => self.sessions_dir = Some(PathBuf::from(value)),
            "autosave" => self.autosave = Some(parse_bool(value)?),
            "request-timeout" => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| format!("'{value}' is not a whole number of seconds"))?;
                self.request_timeout_secs = Some(validate_request_timeout(secs)?);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Apply `nova config unset <key>`.
    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        match key {
            "backend" => self.backend = None,
            "base-url" => self.base_url = None,
            "default-model" => self.default_model = None,
            "hosted-base-url" => self.hosted_base_url = None,
            "hosted-model" => self.hosted_model = None,
            "default-preset" => self.default_preset = None,
            "temperature" => self.temperature = None,
            "sessions-dir" => self.sessions_dir = None,
            "autosave" => self.autosave = None,
            "request-timeout" => self.request_timeout_secs = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key '{key}'. Available keys: {}",
        CONFIG_KEYS.join(", ")
    )
}
