//! Streaming event types

use crate::types::Usage;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_stream::Stream;

/// Events emitted while a chat completion streams in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageEvent {
    /// Stream opened
    Start { model: String },
    /// A non-empty piece of answer text
    TextDelta { delta: String },
    /// Stream completed successfully
    Done {
        text: String,
        finish_reason: Option<String>,
        usage: Usage,
    },
    /// Provider failed; nothing follows this event
    Error { message: String },
}

/// A stream of message events
pub type MessageEventStream = Pin<Box<dyn Stream<Item = MessageEvent> + Send>>;
