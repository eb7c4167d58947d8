// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the chat assistant gateway.
//!
//! Provides [`AssistantClient`], which POSTs the conversation and turns
//! whatever comes back (a JSON object, an SSE-like stream, an error status,
//! or nothing) into an ordered [`StreamEvent`] stream. Failures never
//! escape as `Err`: they become a single `Error` event before `Done`.

use std::collections::VecDeque;
use std::time::Duration;

use arpent_config::model::AssistantConfig;
use arpent_core::{ArpentError, ChatTurn, StreamEvent};
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::extract::extract_text;
use crate::messages;
use crate::sse::SseConsumer;

/// Stream of reply events; always ends with exactly one [`StreamEvent::Done`].
pub type ReplyStream = BoxStream<'static, StreamEvent>;

/// Request body sent to the gateway.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatTurn],
}

/// HTTP client for the assistant gateway.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AssistantClient {
    /// Creates a client that sends `apikey` and `Authorization: Bearer` on
    /// every request.
    ///
    /// No timeout is applied unless `timeout` is set.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: &str,
        bearer_token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ArpentError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|e| ArpentError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {bearer_token}"))
                .map_err(|e| ArpentError::Config(format!("invalid bearer token header value: {e}")))?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ArpentError::Assistant {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Creates a client from the `[assistant]` config section.
    ///
    /// Requires `endpoint` and `api_key`; the bearer token falls back to the key.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, ArpentError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| ArpentError::Config("assistant.endpoint is not set".into()))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| ArpentError::Config("assistant.api_key is not set".into()))?;
        let bearer = config.effective_bearer().unwrap_or(api_key);

        let client = Self::new(
            endpoint,
            api_key,
            bearer,
            config.timeout_secs.map(Duration::from_secs),
        )?;
        info!(endpoint, "assistant client initialized");
        Ok(client)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the conversation and streams the reply.
    ///
    /// Nothing is sent until the stream is first polled. The turn list is
    /// forwarded as-is, even when empty.
    pub fn reply(&self, turns: Vec<ChatTurn>) -> ReplyStream {
        let state = ReplyState {
            phase: Phase::Request {
                client: self.clone(),
                turns,
            },
            queue: VecDeque::new(),
        };

        stream::unfold(state, |mut state| async move {
            loop {
                if let Some(event) = state.queue.pop_front() {
                    return Some((event, state));
                }
                match std::mem::replace(&mut state.phase, Phase::Finished) {
                    Phase::Request { client, turns } => match client.send(&turns).await {
                        Outcome::Complete(event) => {
                            state.queue.push_back(event);
                            state.queue.push_back(StreamEvent::Done);
                        }
                        Outcome::Body(body) => {
                            state.phase = Phase::Body {
                                body,
                                consumer: SseConsumer::new(),
                            };
                        }
                    },
                    Phase::Body { mut body, mut consumer } => match body.next().await {
                        Some(Ok(chunk)) => {
                            state.queue.extend(consumer.feed(&chunk));
                            if consumer.is_stopped() {
                                state.queue.extend(consumer.finish());
                                state.queue.push_back(StreamEvent::Done);
                            } else {
                                state.phase = Phase::Body { body, consumer };
                            }
                        }
                        Some(Err(e)) => {
                            warn!(
                                error = %e,
                                produced = consumer.has_produced(),
                                "assistant stream aborted by transport"
                            );
                            state.queue.push_back(StreamEvent::Error(messages::UNREACHABLE.into()));
                            state.queue.push_back(StreamEvent::Done);
                        }
                        None => {
                            state.queue.extend(consumer.finish());
                            state.queue.push_back(StreamEvent::Done);
                        }
                    },
                    Phase::Finished => return None,
                }
            }
        })
        .boxed()
    }

    /// Performs the round trip and classifies the response.
    async fn send(&self, turns: &[ChatTurn]) -> Outcome {
        let response = match self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { messages: turns })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "assistant gateway unreachable");
                return Outcome::Complete(StreamEvent::Error(messages::UNREACHABLE.into()));
            }
        };

        let status = response.status();
        debug!(status = %status, turns = turns.len(), "assistant response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "assistant gateway returned an error status");
            return Outcome::Complete(StreamEvent::Error(upstream_error_message(status, &body)));
        }

        if is_json(&response) {
            let event = match response.text().await {
                Ok(body) => json_reply_event(&body),
                Err(e) => {
                    warn!(error = %e, "failed to read assistant JSON body");
                    StreamEvent::Error(messages::INVALID_RESPONSE.into())
                }
            };
            return Outcome::Complete(event);
        }

        if has_no_body(&response) {
            return Outcome::Complete(StreamEvent::Error(messages::NO_RESPONSE.into()));
        }

        debug!("consuming assistant reply as a stream");
        Outcome::Body(response.bytes_stream().boxed())
    }
}

/// Result of the request phase.
enum Outcome {
    /// The reply is fully known: one `Delta` or one `Error`.
    Complete(StreamEvent),
    /// The body must be consumed incrementally.
    Body(BoxStream<'static, reqwest::Result<Bytes>>),
}

enum Phase {
    Request {
        client: AssistantClient,
        turns: Vec<ChatTurn>,
    },
    Body {
        body: BoxStream<'static, reqwest::Result<Bytes>>,
        consumer: SseConsumer,
    },
    Finished,
}

struct ReplyState {
    phase: Phase,
    queue: VecDeque<StreamEvent>,
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn has_no_body(response: &Response) -> bool {
    matches!(
        response.status(),
        StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT
    ) || response.content_length() == Some(0)
}

/// Picks the most specific message out of an error-status body.
///
/// Recognizes `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`; anything else gets a generic text.
fn upstream_error_message(status: StatusCode, body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return messages::upstream_status(status.as_u16());
    };

    let error = value.get("error");
    error
        .and_then(Value::as_str)
        .or_else(|| error.and_then(|e| e.get("message")).and_then(Value::as_str))
        .or_else(|| value.get("message").and_then(Value::as_str))
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| messages::upstream_status(status.as_u16()))
}

/// Turns a whole JSON reply into its single event.
fn json_reply_event(body: &str) -> StreamEvent {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "assistant JSON body did not parse");
            return StreamEvent::Error(messages::INVALID_RESPONSE.into());
        }
    };

    let text = extract_text(&value);
    if !text.is_empty() {
        return StreamEvent::Delta(text);
    }
    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or(messages::INVALID_RESPONSE);
    StreamEvent::Error(error.to_string())
}
