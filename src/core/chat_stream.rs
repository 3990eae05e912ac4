//! Streaming client for the local model server.
//!
//! `POST /api/chat` answers with newline-delimited JSON objects. Each object
//! may carry a content fragment; one with `done: true` ends the reply. The
//! body is buffered across network reads and split on `\n`, so an object cut
//! in half by the transport is reassembled before parsing.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use memchr::memchr;
use tracing::{debug, warn};

use crate::api::{ChatChunk, ChatMessage, ChatOptions, ChatRequest};
use crate::core::backend::{BackendError, BackendKind, ChatBackend};
use crate::utils::url::construct_api_url;

/// A finite, non-restartable sequence of reply fragments.
pub type FragmentStream = BoxStream<'static, Result<String, BackendError>>;

#[derive(Debug, PartialEq)]
enum LineOutcome {
    Skip,
    Fragment(String),
    /// Last fragment; nothing after it is read.
    FinalFragment(String),
    Done,
    ApiError(String),
    Malformed(String),
}

fn process_ndjson_line(line: &[u8]) -> LineOutcome {
    let line = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(err) => return LineOutcome::Malformed(format!("invalid UTF-8 in stream: {err}")),
    };
    if line.is_empty() {
        return LineOutcome::Skip;
    }

    let chunk = match serde_json::from_str::<ChatChunk>(line) {
        Ok(chunk) => chunk,
        Err(err) => return LineOutcome::Malformed(format!("unparsable chunk ({err}): {line}")),
    };

    if let Some(error) = chunk.error {
        return LineOutcome::ApiError(error);
    }

    let content = chunk
        .message
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty());

    match (content, chunk.done) {
        (Some(content), false) => LineOutcome::Fragment(content),
        (Some(content), true) => LineOutcome::FinalFragment(content),
        (None, true) => LineOutcome::Done,
        (None, false) => LineOutcome::Skip,
    }
}

struct StreamState {
    request: Option<reqwest::RequestBuilder>,
    body: Option<BoxStream<'static, Result<Vec<u8>, reqwest::Error>>>,
    buffer: Vec<u8>,
    finished: bool,
}

async fn open_stream(
    request: reqwest::RequestBuilder,
) -> Result<BoxStream<'static, Result<Vec<u8>, reqwest::Error>>, BackendError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(BackendError::Status { status, body });
    }

    Ok(response
        .bytes_stream()
        .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
        .boxed())
}

async fn next_fragment(
    mut state: StreamState,
) -> Option<(Result<String, BackendError>, StreamState)> {
    if state.finished {
        return None;
    }

    if let Some(request) = state.request.take() {
        match open_stream(request).await {
            Ok(body) => state.body = Some(body),
            Err(err) => {
                state.finished = true;
                return Some((Err(err), state));
            }
        }
    }

    loop {
        while let Some(newline_pos) = memchr(b'\n', &state.buffer) {
            let line: Vec<u8> = state.buffer.drain(..=newline_pos).collect();
            match process_ndjson_line(&line) {
                LineOutcome::Skip => continue,
                LineOutcome::Fragment(content) => return Some((Ok(content), state)),
                LineOutcome::FinalFragment(content) => {
                    state.finished = true;
                    return Some((Ok(content), state));
                }
                LineOutcome::Done => {
                    state.finished = true;
                    return None;
                }
                LineOutcome::ApiError(message) => {
                    warn!(%message, "Local backend reported an error");
                    state.finished = true;
                    return Some((Err(BackendError::Api(message)), state));
                }
                LineOutcome::Malformed(message) => {
                    warn!(%message, "Skipping turn after malformed stream chunk");
                    state.finished = true;
                    return Some((Err(BackendError::Malformed(message)), state));
                }
            }
        }

        let Some(body) = state.body.as_mut() else {
            // Body exhausted and every buffered line consumed.
            state.finished = true;
            return None;
        };

        match body.next().await {
            Some(Ok(bytes)) => state.buffer.extend_from_slice(&bytes),
            Some(Err(err)) => {
                state.finished = true;
                return Some((Err(BackendError::Transport(err)), state));
            }
            None => {
                debug!("Local backend closed the stream without a done marker");
                state.body = None;
                if !state.buffer.is_empty() {
                    state.buffer.push(b'\n');
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct LocalClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl LocalClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a streamed chat call. Nothing is sent until the stream is first
    /// polled; the stream ends after the done marker.
    pub fn chat(&self, model: &str, messages: Vec<ChatMessage>, temperature: f32) -> FragmentStream {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
            options: ChatOptions { temperature },
            stream: true,
        };
        let http_request = self
            .client
            .post(construct_api_url(&self.base_url, "api/chat"))
            .timeout(self.request_timeout)
            .json(&request);

        let state = StreamState {
            request: Some(http_request),
            body: None,
            buffer: Vec::new(),
            finished: false,
        };

        stream::unfold(state, next_fragment).boxed()
    }
}

#[async_trait]
impl ChatBackend for LocalClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn reply(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
        on_fragment: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, BackendError> {
        let mut fragments = self.chat(model, messages, temperature);
        let mut full_response = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            full_response.push_str(&fragment);
        }
        Ok(full_response)
    }

    fn failure_message(&self, err: &BackendError) -> String {
        format!(
            "⚠️ Nova couldn’t reach the local model server at {}.\n\nError: {}\n\nMake sure the server is running and the model exists.",
            self.base_url, err
        )
    }

    async fn list_models(&self) -> Vec<String> {
        crate::api::models::list_models(&self.client, &self.base_url).await
    }
}
