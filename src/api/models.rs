use std::time::Duration;

use tracing::debug;

use crate::api::ModelsResponse;
use crate::utils::url::construct_api_url;

/// Upper bound for the tags lookup; discovery must never stall startup.
pub const MODELS_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<ModelsResponse, Box<dyn std::error::Error>> {
    let tags_url = construct_api_url(base_url, "api/tags");
    let response = client.get(tags_url).timeout(MODELS_TIMEOUT).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    let models_response = response.json::<ModelsResponse>().await?;
    Ok(models_response)
}

/// Names of the models installed on the local server. Any failure yields an
/// empty list so callers can fall back to free-text model entry.
pub async fn list_models(client: &reqwest::Client, base_url: &str) -> Vec<String> {
    match fetch_models(client, base_url).await {
        Ok(response) => response
            .models
            .into_iter()
            .map(|model| model.name)
            .collect(),
        Err(err) => {
            debug!(base_url, error = %err, "Model discovery failed");
            Vec::new()
        }
    }
}

/// Pick the model to start with: the configured default when the server has
/// it, otherwise the first listed model.
pub fn select_initial_model(available: &[String], default_model: &str) -> String {
    if available.iter().any(|name| name == default_model) {
        return default_model.to_string();
    }
    available
        .first()
        .cloned()
        .unwrap_or_else(|| default_model.to_string())
}
