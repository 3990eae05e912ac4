//! Resolution of the effective settings for one run.
//!
//! Precedence, highest first: environment variables, `config.toml`, built-in
//! defaults. Empty environment values are treated as unset.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::backend::BackendKind;
use crate::core::config::data::{
    validate_request_timeout, validate_temperature, Config, DEFAULT_BASE_URL,
    DEFAULT_HOSTED_BASE_URL, DEFAULT_HOSTED_MODEL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TEMPERATURE,
};
use crate::core::config::io::{project_dirs, ConfigError};

pub const ENV_BACKEND: &str = "NOVA_BACKEND";
pub const ENV_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const ENV_MODEL: &str = "NOVA_MODEL";
pub const ENV_HOSTED_BASE_URL: &str = "NOVA_HOSTED_BASE_URL";
pub const ENV_HOSTED_MODEL: &str = "NOVA_HOSTED_MODEL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ACCESS_CODE: &str = "NOVA_ACCESS_CODE";
pub const ENV_SESSIONS_DIR: &str = "NOVA_SESSIONS_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend: BackendKind,
    pub base_url: String,
    pub default_model: String,
    pub hosted_base_url: String,
    pub hosted_model: String,
    pub api_key: Option<String>,
    pub access_code: Option<String>,
    pub default_preset: Option<String>,
    pub temperature: f32,
    pub autosave: bool,
    pub sessions_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Settings {
    /// Load `config.toml`, apply the environment, then a command-line backend
    /// override if one was given.
    pub fn load(backend: Option<BackendKind>) -> Result<Self, ConfigError> {
        let config = Config::load()?;
        let mut settings = Self::from_environment(&config)?;
        if let Some(backend) = backend {
            settings.backend = backend;
        }
        Ok(settings)
    }

    pub fn from_environment(config: &Config) -> Result<Self, ConfigError> {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(config: &Config, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let backend = match env(ENV_BACKEND) {
            Some(value) => value.parse::<BackendKind>().map_err(|message| ConfigError::Invalid {
                key: ENV_BACKEND.to_string(),
                message,
            })?,
            None => config.backend.unwrap_or_default(),
        };

        let temperature = validate_temperature(config.temperature.unwrap_or(DEFAULT_TEMPERATURE))
            .map_err(|message| ConfigError::Invalid {
                key: "temperature".to_string(),
                message,
            })?;

        let request_timeout_secs = validate_request_timeout(
            config
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
        .map_err(|message| ConfigError::Invalid {
            key: "request-timeout".to_string(),
            message,
        })?;

        let sessions_dir = env(ENV_SESSIONS_DIR)
            .map(PathBuf::from)
            .or_else(|| config.sessions_dir.clone())
            .unwrap_or_else(default_sessions_dir);

        Ok(Self {
            backend,
            base_url: env(ENV_BASE_URL)
                .or_else(|| config.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_model: env(ENV_MODEL)
                .or_else(|| config.default_model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            hosted_base_url: env(ENV_HOSTED_BASE_URL)
                .or_else(|| config.hosted_base_url.clone())
                .unwrap_or_else(|| DEFAULT_HOSTED_BASE_URL.to_string()),
            hosted_model: env(ENV_HOSTED_MODEL)
                .or_else(|| config.hosted_model.clone())
                .unwrap_or_else(|| DEFAULT_HOSTED_MODEL.to_string()),
            api_key: env(ENV_API_KEY).or_else(|| config.api_key.clone()),
            access_code: env(ENV_ACCESS_CODE)
                .or_else(|| config.access_code.clone())
                .filter(|code| !code.is_empty()),
            default_preset: config.default_preset.clone(),
            temperature,
            autosave: config.autosave.unwrap_or(true),
            sessions_dir,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    /// The API key, or the fatal error the hosted backend reports without one.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

fn default_sessions_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("sessions"))
        .unwrap_or_else(|| PathBuf::from("sessions"))
}
