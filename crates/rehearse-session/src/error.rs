//! Error types for rehearse-session

use thiserror::Error;

/// Result type alias using rehearse-session Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the user at the end of a failed round
#[derive(Error, Debug)]
pub enum Error {
    /// Speech-to-text call failed or returned something unusable
    #[error("Transcription error: {0}")]
    Transcription(#[source] rehearse_ai::Error),

    /// Language-model call failed to open or broke mid-stream
    #[error("LLM error: {0}")]
    Generation(#[source] rehearse_ai::Error),

    /// No API key was found at startup
    #[error("No API key found; set {env_var} or add api_key to the config file")]
    CredentialMissing { env_var: String },
}

impl Error {
    pub fn is_transcription(&self) -> bool {
        matches!(self, Error::Transcription(_))
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, Error::Generation(_))
    }
}

/// A single document unit (page) that could not be read.
/// Recovered inside the document store and never surfaced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unit {unit}: {message}")]
pub struct ExtractionError {
    /// Zero-based unit index; the whole document when it could not be opened
    pub unit: usize,
    pub message: String,
}

impl ExtractionError {
    pub fn new(unit: usize, message: impl Into<String>) -> Self {
        Self {
            unit,
            message: message.into(),
        }
    }
}
