//! Incremental answer stream over a provider's message events.

use futures::StreamExt;
use rehearse_ai::{MessageEvent, MessageEventStream};

use crate::error::{Error, Result};

/// Pulls answer fragments from a chat stream, accumulating the full text.
///
/// Yields non-empty text deltas in order. A mid-stream failure is yielded
/// once as an error; after that, or after the stream completes, every
/// further call returns `None`.
pub struct AnswerStream {
    inner: MessageEventStream,
    text: String,
    finished: bool,
}

impl AnswerStream {
    pub fn new(inner: MessageEventStream) -> Self {
        Self {
            inner,
            text: String::new(),
            finished: false,
        }
    }

    /// Next text fragment, `Some(Err)` once on failure, `None` when done
    pub async fn next_fragment(&mut self) -> Option<Result<String>> {
        if self.finished {
            return None;
        }

        while let Some(event) = self.inner.next().await {
            match event {
                MessageEvent::Start { model } => {
                    tracing::trace!(model = %model, "Answer stream started");
                }
                MessageEvent::TextDelta { delta } => {
                    if delta.is_empty() {
                        continue;
                    }
                    self.text.push_str(&delta);
                    return Some(Ok(delta));
                }
                MessageEvent::Done {
                    finish_reason,
                    usage,
                    ..
                } => {
                    tracing::debug!(
                        finish_reason = finish_reason.as_deref().unwrap_or("unknown"),
                        input_tokens = usage.input,
                        output_tokens = usage.output,
                        "Answer stream complete"
                    );
                    self.finished = true;
                    return None;
                }
                MessageEvent::Error { message } => {
                    self.finished = true;
                    return Some(Err(Error::Generation(
                        rehearse_ai::Error::StreamFailed(message),
                    )));
                }
            }
        }

        self.finished = true;
        None
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The accumulated answer, trimmed
    pub fn into_answer(self) -> String {
        self.text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehearse_ai::Usage;

    fn stream_of(events: Vec<MessageEvent>) -> AnswerStream {
        AnswerStream::new(Box::pin(futures::stream::iter(events)))
    }

    fn delta(s: &str) -> MessageEvent {
        MessageEvent::TextDelta { delta: s.into() }
    }

    fn done() -> MessageEvent {
        MessageEvent::Done {
            text: String::new(),
            finish_reason: Some("stop".into()),
            usage: Usage::default(),
        }
    }

    #[tokio::test]
    async fn test_fragments_in_order() {
        let mut answer = stream_of(vec![
            MessageEvent::Start {
                model: "llama".into(),
            },
            delta("Setup "),
            delta(""),
            delta("time is "),
            delta("a window."),
            done(),
        ]);

        let mut fragments = Vec::new();
        while let Some(fragment) = answer.next_fragment().await {
            fragments.push(fragment.unwrap());
        }
        assert_eq!(fragments, vec!["Setup ", "time is ", "a window."]);
        assert_eq!(answer.text(), "Setup time is a window.");
    }

    #[tokio::test]
    async fn test_none_after_done() {
        let mut answer = stream_of(vec![delta("x"), done(), delta("ignored")]);
        assert!(answer.next_fragment().await.is_some());
        assert!(answer.next_fragment().await.is_none());
        assert!(answer.next_fragment().await.is_none());
        assert_eq!(answer.text(), "x");
    }

    #[tokio::test]
    async fn test_error_yielded_once() {
        let mut answer = stream_of(vec![
            delta("partial "),
            MessageEvent::Error {
                message: "connection reset".into(),
            },
            delta("never seen"),
        ]);

        assert_eq!(answer.next_fragment().await.unwrap().unwrap(), "partial ");
        let err = answer.next_fragment().await.unwrap().unwrap_err();
        assert!(err.is_generation());
        assert_eq!(err.to_string(), "LLM error: connection reset");
        assert!(answer.next_fragment().await.is_none());
        assert_eq!(answer.text(), "partial ");
    }

    #[tokio::test]
    async fn test_stream_ending_without_done() {
        let mut answer = stream_of(vec![delta("  trailing  ")]);
        while answer.next_fragment().await.is_some() {}
        assert_eq!(answer.into_answer(), "trailing");
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let mut answer = stream_of(vec![]);
        assert!(answer.next_fragment().await.is_none());
        assert_eq!(answer.into_answer(), "");
    }
}
