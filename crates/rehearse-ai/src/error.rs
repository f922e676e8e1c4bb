//! Error types for rehearse-ai

use thiserror::Error;

/// Result type alias using rehearse-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a speech-to-text or chat provider
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: {message} (type: {error_type})")]
    Api { error_type: String, message: String },

    /// Invalid API key
    #[error("Invalid or missing API key")]
    InvalidApiKey,

    /// Server-sent events error
    #[error("SSE error: {0}")]
    Sse(String),

    /// The provider stream failed after it was opened
    #[error("{0}")]
    StreamFailed(String),

    /// Unexpected response format
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The provider did not answer within the request timeout
    #[error("Request timed out")]
    Timeout,

    /// Transcription was requested for a recording with no bytes
    #[error("Audio clip is empty")]
    EmptyAudio,
}

impl Error {
    /// Create an API error from type and message
    pub fn api(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Map a failed HTTP status and its body to an API error.
    ///
    /// OpenAI-compatible providers wrap failures as `{"error": {"message", "type"}}`;
    /// anything else is carried through as the raw body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Self::InvalidApiKey;
        }

        #[derive(serde::Deserialize)]
        struct Envelope {
            error: ErrorBody,
        }

        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: String,
            #[serde(rename = "type", default)]
            error_type: Option<String>,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(envelope) => Self::api(
                envelope
                    .error
                    .error_type
                    .unwrap_or_else(|| status.as_u16().to_string()),
                envelope.error.message,
            ),
            Err(_) => {
                let message = if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.trim().to_string()
                };
                Self::api(status.as_u16().to_string(), message)
            }
        }
    }
}
