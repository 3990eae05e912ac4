use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ChatMessage, HostedRequest, HostedResponse};
use crate::core::backend::{BackendError, BackendKind, ChatBackend};
use crate::utils::url::construct_api_url;

/// Non-streaming client for the hosted API: one request, one complete reply.
#[derive(Clone)]
pub struct HostedClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    request_timeout: Duration,
}

impl HostedClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout,
        }
    }

    pub async fn chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<String, BackendError> {
        let request = HostedRequest {
            model: model.to_string(),
            input: messages,
            temperature,
        };

        let response = self
            .client
            .post(construct_api_url(&self.base_url, "responses"))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            debug!(%status, "Hosted backend returned an error status");
            return Err(BackendError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: HostedResponse = serde_json::from_str(&body)
            .map_err(|err| BackendError::Malformed(format!("{err}: {}", body.trim())))?;

        parsed
            .text()
            .ok_or_else(|| BackendError::Malformed("response contained no output text".to_string()))
    }
}

#[async_trait]
impl ChatBackend for HostedClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Hosted
    }

    async fn reply(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
        on_fragment: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, BackendError> {
        let text = self.chat(model, messages, temperature).await?;
        on_fragment(&text);
        Ok(text)
    }

    /// Provider errors are shown as received, after the status line.
    fn failure_message(&self, err: &BackendError) -> String {
        match err {
            BackendError::Status { status, body } => format!("HTTP {status}\n{body}"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{spawn_mock_server, unreachable_base_url, MockResponse};

    fn test_client(base_url: &str) -> HostedClient {
        HostedClient::new(
            reqwest::Client::new(),
            base_url,
            "sk-test",
            Duration::from_secs(10),
        )
    }

    #[tokio::test]
    async fn chat_sends_input_and_returns_output_text() {
        let server = spawn_mock_server(vec![MockResponse::json(
            200,
            r#"{"id":"resp_1","output_text":"Hello from the cloud"}"#,
        )])
        .await;

        let client = test_client(&server.base_url);
        let text = client
            .chat(
                "gpt-4o-mini",
                vec![
                    ChatMessage::new("system", "Be kind."),
                    ChatMessage::new("user", "Hi"),
                ],
                0.25,
            )
            .await
            .expect("chat should succeed");

        assert_eq!(text, "Hello from the cloud");

        let requests = server.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request_line, "POST /responses HTTP/1.1");
        assert_eq!(requests[0].header("authorization"), Some("Bearer sk-test"));
        assert_eq!(
            requests[0].body_json(),
            serde_json::json!({
                "model": "gpt-4o-mini",
                "input": [
                    {"role": "system", "content": "Be kind."},
                    {"role": "user", "content": "Hi"}
                ],
                "temperature": 0.25
            })
        );
    }

    #[tokio::test]
    async fn reply_reports_whole_text_as_one_fragment() {
        let server = spawn_mock_server(vec![MockResponse::json(
            200,
            r#"{"output":[{"type":"message","content":[{"type":"output_text","text":"Done."}]}]}"#,
        )])
        .await;

        let client = test_client(&server.base_url);
        let mut seen = Vec::new();
        let text = client
            .reply("m", Vec::new(), 0.3, &mut |fragment: &str| {
                seen.push(fragment.to_string())
            })
            .await
            .expect("reply");

        assert_eq!(text, "Done.");
        assert_eq!(seen, vec!["Done."]);
    }

    #[tokio::test]
    async fn provider_errors_surface_verbatim() {
        let raw_body = r#"{"error":{"message":"Incorrect API key provided","code":"invalid_api_key"}}"#;
        let server = spawn_mock_server(vec![MockResponse::json(401, raw_body)]).await;

        let client = test_client(&server.base_url);
        let err = client
            .chat("m", Vec::new(), 0.3)
            .await
            .expect_err("401 should fail");

        let shown = client.failure_message(&err);
        assert!(shown.starts_with("HTTP 401"));
        assert!(shown.contains(raw_body));
        assert!(!shown.contains("```"));
    }

    #[tokio::test]
    async fn missing_output_is_malformed() {
        let server = spawn_mock_server(vec![MockResponse::json(200, r#"{"output":[]}"#)]).await;
        let client = test_client(&server.base_url);
        let err = client.chat("m", Vec::new(), 0.3).await.unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let base_url = unreachable_base_url().await;
        let client = test_client(&base_url);
        let err = client.chat("m", Vec::new(), 0.3).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        assert!(!client.failure_message(&err).is_empty());
    }
}
