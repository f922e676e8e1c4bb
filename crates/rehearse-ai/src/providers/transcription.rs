//! OpenAI-compatible audio transcription provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    http,
    providers::Transcriber,
    types::{Model, TranscriptionOptions},
};

/// File name and MIME type the finished recording is uploaded as
const AUDIO_FILE_NAME: &str = "audio.wav";
const AUDIO_MIME: &str = "audio/wav";

/// Speech-to-text client for `/audio/transcriptions`
pub struct OpenAITranscriber {
    client: reqwest::Client,
    api_key: Option<String>,
    model: Model,
    timeout: Duration,
}

impl OpenAITranscriber {
    /// Create a transcriber for a speech-to-text model. A missing key is
    /// reported when a recording is actually transcribed.
    pub fn new(model: Model, api_key: Option<String>) -> Self {
        Self {
            client: http::shared_client(),
            api_key,
            model,
            timeout: http::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Text fields sent alongside the audio file
fn form_fields(model: &Model, options: &TranscriptionOptions) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("model", model.id.clone()),
        ("response_format", "text".to_string()),
        ("temperature", "0".to_string()),
    ];
    if let Some(language) = options.language.as_deref().filter(|l| !l.trim().is_empty()) {
        fields.push(("language", language.trim().to_string()));
    }
    fields
}

/// Decode a transcription body. `response_format=text` yields the transcript
/// verbatim, but some gateways ignore the format and answer `{"text": ...}`.
/// A body that only looks like JSON is kept as spoken text.
fn decode_transcript(body: &[u8]) -> Result<String> {
    #[derive(Deserialize)]
    struct JsonTranscript {
        text: String,
    }

    let text = std::str::from_utf8(body)
        .map_err(|e| Error::UnexpectedResponse(format!("transcript is not UTF-8: {}", e)))?;
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        match serde_json::from_str::<JsonTranscript>(trimmed) {
            Ok(t) => return Ok(t.text.trim().to_string()),
            Err(e) => tracing::trace!("Transcript is not a JSON envelope: {}", e),
        }
    }

    Ok(trimmed.to_string())
}

#[async_trait]
impl Transcriber for OpenAITranscriber {
    async fn transcribe(&self, audio: &[u8], options: &TranscriptionOptions) -> Result<String> {
        if audio.is_empty() {
            return Err(Error::EmptyAudio);
        }
        let api_key = self.api_key.as_deref().ok_or(Error::InvalidApiKey)?;
        let headers = http::auth_headers(api_key, &self.model.headers)?;
        let url = format!("{}/audio/transcriptions", self.model.base_url);

        let file = Part::bytes(audio.to_vec())
            .file_name(AUDIO_FILE_NAME)
            .mime_str(AUDIO_MIME)?;
        let form = form_fields(&self.model, options)
            .into_iter()
            .fold(Form::new().part("file", file), |form, (name, value)| {
                form.text(name, value)
            });

        tracing::debug!(
            model = %self.model.id,
            bytes = audio.len(),
            language = options.language.as_deref().unwrap_or("auto"),
            "Sending transcription request"
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { Error::Timeout } else { Error::Http(e) })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Error::from_status(status, &String::from_utf8_lossy(&body)));
        }

        decode_transcript(&body)
    }
}
