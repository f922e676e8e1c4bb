//! OpenAI-compatible Chat Completions provider (Groq, OpenAI, gateways)

use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    http,
    providers::ChatProvider,
    stream::{MessageEvent, MessageEventStream},
    types::{Message, Model, SamplingOptions, Usage},
};

/// Streaming chat-completions client
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAIProvider {
    /// Create a provider. A missing key is accepted here and reported when a
    /// request is actually made.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http::shared_client(),
            api_key,
            timeout: http::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_request(
        &self,
        model: &Model,
        messages: &[Message],
        options: &SamplingOptions,
    ) -> ChatRequest {
        ChatRequest {
            model: model.id.clone(),
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: true,
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: model.max_tokens,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    async fn stream(
        &self,
        model: &Model,
        messages: &[Message],
        options: &SamplingOptions,
    ) -> Result<MessageEventStream> {
        let api_key = self.api_key.as_deref().ok_or(Error::InvalidApiKey)?;
        let request = self.build_request(model, messages, options);
        let url = format!("{}/chat/completions", model.base_url);
        let headers = http::auth_headers(api_key, &model.headers)?;

        tracing::debug!(
            model = %model.id,
            messages = request.messages.len(),
            temperature = options.temperature,
            top_p = options.top_p,
            "Opening chat completion stream"
        );

        let request_builder = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(self.timeout)
            .json(&request);

        let event_source = EventSource::new(request_builder)
            .map_err(|e| Error::Sse(format!("Failed to create event source: {}", e)))?;

        Ok(Box::pin(create_stream(event_source, model.id.clone())))
    }
}

fn create_stream(
    mut event_source: EventSource,
    model_id: String,
) -> impl futures::Stream<Item = MessageEvent> {
    stream! {
        let mut accumulated_text = String::new();
        let mut finish_reason: Option<String> = None;
        let mut usage = Usage::default();

        yield MessageEvent::Start { model: model_id };

        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(msg)) => {
                    if msg.data.trim() == "[DONE]" {
                        break;
                    }

                    match parse_chunk(&msg.data) {
                        ChunkOutcome::Skip => {
                            tracing::trace!(data = %msg.data, "Skipping chunk without content");
                        }
                        ChunkOutcome::Error(message) => {
                            event_source.close();
                            yield MessageEvent::Error { message };
                            return;
                        }
                        ChunkOutcome::Parsed(chunk) => {
                            if let Some(delta) = chunk.delta {
                                accumulated_text.push_str(&delta);
                                yield MessageEvent::TextDelta { delta };
                            }
                            if chunk.finish_reason.is_some() {
                                finish_reason = chunk.finish_reason;
                            }
                            if let Some(u) = chunk.usage {
                                usage = u;
                            }
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    event_source.close();
                    let body = response.text().await.unwrap_or_default();
                    yield MessageEvent::Error {
                        message: Error::from_status(status, &body).to_string(),
                    };
                    return;
                }
                Err(reqwest_eventsource::Error::Transport(e)) if e.is_timeout() => {
                    event_source.close();
                    yield MessageEvent::Error { message: Error::Timeout.to_string() };
                    return;
                }
                Err(e) => {
                    event_source.close();
                    yield MessageEvent::Error {
                        message: format!("SSE error: {}", e),
                    };
                    return;
                }
            }
        }

        event_source.close();

        yield MessageEvent::Done {
            text: accumulated_text,
            finish_reason,
            usage,
        };
    }
}

/// What a single `data:` payload contributed to the stream
#[derive(Debug, PartialEq)]
enum ChunkOutcome {
    /// Malformed JSON, no choices, or no content: not an error
    Skip,
    /// The provider reported a failure inside the stream
    Error(String),
    Parsed(ParsedChunk),
}

#[derive(Debug, Default, PartialEq)]
struct ParsedChunk {
    delta: Option<String>,
    finish_reason: Option<String>,
    usage: Option<Usage>,
}

fn parse_chunk(data: &str) -> ChunkOutcome {
    let chunk: StreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(_) => return ChunkOutcome::Skip,
    };

    if let Some(error) = chunk.error {
        return ChunkOutcome::Error(
            Error::api(error.error_type.unwrap_or_else(|| "stream_error".into()), error.message)
                .to_string(),
        );
    }

    let mut parsed = ParsedChunk {
        usage: chunk
            .usage
            .or(chunk.x_groq.and_then(|x| x.usage))
            .map(|u| Usage {
                input: u.prompt_tokens,
                output: u.completion_tokens,
            }),
        ..Default::default()
    };

    if let Some(choice) = chunk.choices.into_iter().next() {
        parsed.delta = choice
            .delta
            .and_then(|d| d.content)
            .filter(|c| !c.is_empty());
        parsed.finish_reason = choice.finish_reason;
    }

    if parsed == ParsedChunk::default() {
        ChunkOutcome::Skip
    } else {
        ChunkOutcome::Parsed(parsed)
    }
}

// Request types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

// Streaming response types

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    usage: Option<StreamUsage>,
    #[serde(default)]
    x_groq: Option<GroqExtension>,
    #[serde(default)]
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GroqExtension {
    #[serde(default)]
    usage: Option<StreamUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;

    #[test]
    fn test_build_request_carries_sampling_and_order() {
        let provider = OpenAIProvider::new(Some("k".into()));
        let model = Model::new(Provider::Groq, "llama-3.3-70b-versatile");
        let messages = vec![
            Message::system("persona"),
            Message::user("q"),
            Message::assistant("a"),
        ];
        let request = provider.build_request(&model, &messages, &SamplingOptions::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["stream"], true);
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["top_p"], 1.0);
        assert!(json.get("max_tokens").is_none());
        let roles: Vec<&str> = json["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn test_parse_chunk_content() {
        let data = r#"{"choices":[{"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        assert_eq!(
            parse_chunk(data),
            ChunkOutcome::Parsed(ParsedChunk {
                delta: Some("Hel".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_parse_chunk_role_only_is_skipped() {
        let data = r#"{"choices":[{"delta":{"role":"assistant"},"finish_reason":null}]}"#;
        assert_eq!(parse_chunk(data), ChunkOutcome::Skip);
    }

    #[test]
    fn test_parse_chunk_empty_content_is_skipped() {
        let data = r#"{"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(parse_chunk(data), ChunkOutcome::Skip);
    }

    #[test]
    fn test_parse_chunk_no_choices_is_skipped() {
        assert_eq!(parse_chunk(r#"{"choices":[]}"#), ChunkOutcome::Skip);
        assert_eq!(parse_chunk(r#"{"id":"x"}"#), ChunkOutcome::Skip);
    }

    #[test]
    fn test_parse_chunk_malformed_is_skipped() {
        assert_eq!(parse_chunk("not json"), ChunkOutcome::Skip);
        assert_eq!(parse_chunk(""), ChunkOutcome::Skip);
    }

    #[test]
    fn test_parse_chunk_finish_and_groq_usage() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":"stop"}],
            "x_groq":{"usage":{"prompt_tokens":12,"completion_tokens":34}}}"#;
        match parse_chunk(data) {
            ChunkOutcome::Parsed(chunk) => {
                assert_eq!(chunk.delta, None);
                assert_eq!(chunk.finish_reason.as_deref(), Some("stop"));
                assert_eq!(
                    chunk.usage,
                    Some(Usage {
                        input: 12,
                        output: 34
                    })
                );
            }
            other => panic!("expected parsed chunk, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chunk_error_payload() {
        let data = r#"{"error":{"message":"overloaded","type":"server_error"}}"#;
        match parse_chunk(data) {
            ChunkOutcome::Error(message) => {
                assert!(message.contains("overloaded"));
                assert!(message.contains("server_error"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stream_without_key_fails_lazily() {
        let provider = OpenAIProvider::new(None);
        let model = Model::new(Provider::Groq, "m");
        let result = provider
            .stream(&model, &[Message::user("hi")], &SamplingOptions::default())
            .await;
        assert!(matches!(result, Err(Error::InvalidApiKey)));
    }
}
