use reqwest::Client;
use tracing::{debug, warn};

use crate::api::models::select_initial_model;
use crate::core::backend::{BackendKind, ChatBackend};
use crate::core::chat_stream::LocalClient;
use crate::core::config::{ConfigError, Settings};
use crate::core::hosted::HostedClient;

/// Build the backend selected in `settings`.
///
/// The hosted backend cannot start without an API key; that is the only
/// fatal condition here.
pub fn build_backend(settings: &Settings) -> Result<Box<dyn ChatBackend>, ConfigError> {
    let client = Client::new();
    match settings.backend {
        BackendKind::Local => Ok(Box::new(LocalClient::new(
            client,
            settings.base_url.clone(),
            settings.request_timeout,
        ))),
        BackendKind::Hosted => {
            let api_key = settings.require_api_key()?;
            Ok(Box::new(HostedClient::new(
                client,
                settings.hosted_base_url.clone(),
                api_key,
                settings.request_timeout,
            )))
        }
    }
}

/// Pick the model a session starts with.
///
/// An explicit request always wins. The local backend otherwise prefers its
/// configured default when the server has it and falls back to the first
/// model the server reports.
pub async fn resolve_initial_model(
    backend: &dyn ChatBackend,
    settings: &Settings,
    requested: Option<&str>,
) -> String {
    if let Some(model) = requested.map(str::trim).filter(|m| !m.is_empty()) {
        return model.to_string();
    }

    match backend.kind() {
        BackendKind::Hosted => settings.hosted_model.clone(),
        BackendKind::Local => {
            let available = backend.list_models().await;
            if available.is_empty() {
                warn!(
                    base_url = %settings.base_url,
                    model = %settings.default_model,
                    "Could not list models on the local server; using the default model"
                );
            }
            let model = select_initial_model(&available, &settings.default_model);
            debug!(available = available.len(), model = %model, "Selected initial model");
            model
        }
    }
}
