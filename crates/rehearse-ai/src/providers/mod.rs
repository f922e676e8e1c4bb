//! Provider implementations

pub mod openai;
pub mod transcription;

use crate::{Message, MessageEventStream, Model, Result, SamplingOptions, TranscriptionOptions};
use async_trait::async_trait;

pub use openai::OpenAIProvider;
pub use transcription::OpenAITranscriber;

/// Trait for streaming chat providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Stream a completion for a fully assembled message list
    async fn stream(
        &self,
        model: &Model,
        messages: &[Message],
        options: &SamplingOptions,
    ) -> Result<MessageEventStream>;
}

/// Trait for speech-to-text providers
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one finished recording into text
    async fn transcribe(&self, audio: &[u8], options: &TranscriptionOptions) -> Result<String>;
}

/// Get an API key from a provided value or the environment
pub fn get_api_key(provided: Option<&str>, env_var: &str) -> Option<String> {
    if let Some(key) = provided.filter(|k| !k.trim().is_empty()) {
        return Some(key.trim().to_string());
    }

    std::env::var(env_var)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
