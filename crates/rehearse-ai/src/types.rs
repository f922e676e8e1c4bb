//! Core types for provider interactions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Known OpenAI-compatible providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Groq,
    OpenAI,
    Custom,
}

impl Provider {
    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Groq => "Groq",
            Provider::OpenAI => "OpenAI",
            Provider::Custom => "Custom",
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Custom => "REHEARSE_API_KEY",
        }
    }

    /// Default base URL of the provider's OpenAI-compatible API
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Custom => "http://localhost:8000/v1",
        }
    }

    /// Parse a provider name, falling back to `Custom`
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "groq" => Provider::Groq,
            "openai" => Provider::OpenAI,
            _ => Provider::Custom,
        }
    }
}

/// Model definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Model identifier (e.g., "llama-3.3-70b-versatile")
    pub id: String,
    /// Provider
    pub provider: Provider,
    /// Base URL for API calls
    pub base_url: String,
    /// Maximum output tokens, if the request should cap them
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Additional headers for API calls
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Model {
    /// Create a model served from the provider's default endpoint
    pub fn new(provider: Provider, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider,
            base_url: provider.default_base_url().to_string(),
            max_tokens: None,
            headers: HashMap::new(),
        }
    }

    /// Point the model at a different OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input: u32,
    pub output: u32,
}

/// Message roles, in the wire spelling used by chat-completions APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Get the role as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat message. Immutable once built; history turns are
/// `User`/`Assistant` messages, prompts add `System` messages in front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Sampling options for streaming chat requests
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingOptions {
    /// Temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            top_p: 1.0,
        }
    }
}

/// Options for a transcription request
#[derive(Debug, Clone, Default)]
pub struct TranscriptionOptions {
    /// ISO-639-1 language hint; `None` lets the provider detect it
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));

        let json = serde_json::to_value(Message::system("rules")).unwrap();
        assert_eq!(json["role"], "system");
    }

    #[test]
    fn test_role_predicates() {
        assert!(Message::assistant("a").is_assistant());
        assert!(!Message::assistant("a").is_user());
        assert!(Message::system("s").is_system());
    }

    #[test]
    fn test_provider_parse_and_defaults() {
        assert_eq!(Provider::parse("GROQ"), Provider::Groq);
        assert_eq!(Provider::parse("openai"), Provider::OpenAI);
        assert_eq!(Provider::parse("local"), Provider::Custom);
        assert_eq!(Provider::Groq.api_key_env_var(), "GROQ_API_KEY");
    }

    #[test]
    fn test_model_base_url_trailing_slash() {
        let model = Model::new(Provider::Groq, "m").with_base_url("http://host/v1/");
        assert_eq!(model.base_url, "http://host/v1");
    }

    #[test]
    fn test_default_sampling() {
        let opts = SamplingOptions::default();
        assert_eq!(opts.temperature, 0.5);
        assert_eq!(opts.top_p, 1.0);
    }
}
