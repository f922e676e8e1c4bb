//! Round lifecycle: record, transcribe, answer, commit.

use std::sync::Arc;

use rehearse_ai::{
    Model, SamplingOptions, TranscriptionOptions,
    models::DEFAULT_CHAT_MODEL,
    providers::{ChatProvider, Transcriber},
};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::{
    answer::AnswerStream,
    error::Error,
    events::RoundEvent,
    extract::TextExtractor,
    history::DEFAULT_HISTORY_WINDOW,
    prompt::{DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_PERSONA, PromptAssembler},
    session::{RoundPhase, Session},
};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Chat model answering as the candidate
    pub chat_model: Model,
    /// Persona sent as the first system message
    pub system_prompt: String,
    /// Document context clamp, in characters
    pub max_context_chars: usize,
    /// Completed rounds kept before history resets
    pub history_window: usize,
    pub sampling: SamplingOptions,
    /// Spoken language hint for transcription
    pub language: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chat_model: rehearse_ai::models::resolve_model(
                rehearse_ai::Provider::Groq,
                DEFAULT_CHAT_MODEL,
            ),
            system_prompt: DEFAULT_PERSONA.to_string(),
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            history_window: DEFAULT_HISTORY_WINDOW,
            sampling: SamplingOptions::default(),
            language: None,
        }
    }
}

/// How a round ended
#[derive(Debug)]
pub enum RoundOutcome {
    /// Question transcribed, answer streamed and committed
    Answered {
        transcript: String,
        answer: String,
        /// This round filled the history window, which was then cleared
        window_reset: bool,
    },
    /// Speech-to-text failed; history untouched
    TranscriptionFailed { error: Error },
    /// The answer could not be generated. The question stays in history and
    /// whatever streamed before the failure stays on display.
    GenerationFailed {
        transcript: String,
        partial: String,
        error: Error,
    },
}

impl RoundOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, RoundOutcome::Answered { .. })
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            RoundOutcome::Answered { .. } => None,
            RoundOutcome::TranscriptionFailed { error }
            | RoundOutcome::GenerationFailed { error, .. } => Some(error),
        }
    }
}

/// Drives rehearsal rounds for one session
pub struct Rehearsal {
    config: SessionConfig,
    session: Session,
    prompt: PromptAssembler,
    transcriber: Arc<dyn Transcriber>,
    chat: Arc<dyn ChatProvider>,
    /// One unbounded sender per subscriber, so no answer fragment is dropped
    subscribers: Mutex<Vec<mpsc::UnboundedSender<RoundEvent>>>,
}

impl Rehearsal {
    pub fn new(
        config: SessionConfig,
        transcriber: Arc<dyn Transcriber>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            prompt: PromptAssembler::new(config.system_prompt.clone(), config.max_context_chars),
            session: Session::new(config.history_window),
            config,
            transcriber,
            chat,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to round events. Every event emitted after this call is
    /// delivered in order until the receiver is dropped.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<RoundEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn emit(&self, event: RoundEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn clear_display(&mut self) {
        self.session.display.clear();
        self.emit(RoundEvent::DisplayCleared);
    }

    /// Capture began. Clears the display once per round.
    pub fn recording_started(&mut self) {
        if !self.session.cleared {
            self.clear_display();
            self.session.cleared = true;
        }
        self.session.phase = RoundPhase::Recording;
        self.emit(RoundEvent::RecordingStarted);
    }

    /// Capture finished; run a full round on the recording.
    pub async fn recording_stopped(&mut self, audio: &[u8]) -> RoundOutcome {
        self.begin_processing();

        let options = TranscriptionOptions {
            language: self.config.language.clone(),
        };
        tracing::debug!(bytes = audio.len(), "Transcribing recording");

        let transcribed = self.transcriber.transcribe(audio, &options).await;
        let outcome = match transcribed {
            Ok(text) => self.answer(text.trim().to_string()).await,
            Err(e) => {
                let error = Error::Transcription(e);
                self.show_error(&error);
                RoundOutcome::TranscriptionFailed { error }
            }
        };

        self.end_round();
        outcome
    }

    /// Run a round on a typed question, skipping transcription
    pub async fn ask(&mut self, question: &str) -> RoundOutcome {
        self.begin_processing();
        let outcome = self.answer(question.trim().to_string()).await;
        self.end_round();
        outcome
    }

    /// Ingest an uploaded document into `slot`; returns the extracted text
    pub fn document_uploaded(
        &mut self,
        slot: &str,
        bytes: &[u8],
        extractor: Option<&dyn TextExtractor>,
    ) -> String {
        self.session.documents.ingest(slot, bytes, extractor)
    }

    /// Forget the conversation; documents stay
    pub fn clear_history(&mut self) {
        self.session.history.clear();
        tracing::debug!("History cleared");
    }

    fn begin_processing(&mut self) {
        self.session.phase = RoundPhase::Processing;
        self.clear_display();
    }

    fn end_round(&mut self) {
        self.session.phase = RoundPhase::Idle;
        self.session.cleared = false;
        self.emit(RoundEvent::RoundEnd);
    }

    fn show_error(&mut self, error: &Error) {
        let message = error.to_string();
        tracing::warn!("{}", message);
        self.session.display.error = Some(message.clone());
        self.emit(RoundEvent::Error { message });
    }

    async fn answer(&mut self, transcript: String) -> RoundOutcome {
        self.session.display.transcript = transcript.clone();
        self.emit(RoundEvent::Transcript {
            text: transcript.clone(),
        });
        self.session.history.push_user(transcript.clone());

        let messages = self.prompt.build_messages(
            self.session.history.turns(),
            self.session.documents.context(),
        );
        tracing::debug!(
            messages = messages.len(),
            model = %self.config.chat_model.id,
            "Requesting answer"
        );

        let opened = self
            .chat
            .stream(&self.config.chat_model, &messages, &self.config.sampling)
            .await;
        let mut stream = match opened {
            Ok(events) => AnswerStream::new(events),
            Err(e) => return self.generation_failed(transcript, String::new(), Error::Generation(e)),
        };

        while let Some(fragment) = stream.next_fragment().await {
            match fragment {
                Ok(delta) => {
                    self.session.display.answer.push_str(&delta);
                    self.emit(RoundEvent::AnswerDelta { delta });
                }
                Err(error) => {
                    let partial = stream.text().to_string();
                    return self.generation_failed(transcript, partial, error);
                }
            }
        }

        let answer = stream.into_answer();
        self.session.display.answer = answer.clone();
        self.emit(RoundEvent::AnswerEnd {
            answer: answer.clone(),
        });

        let window_reset = self.session.history.commit_answer(answer.clone()).is_reset();
        if window_reset {
            self.emit(RoundEvent::WindowReset);
        }
        tracing::debug!(
            rounds = self.session.history.rounds(),
            window_reset,
            "Round committed"
        );

        RoundOutcome::Answered {
            transcript,
            answer,
            window_reset,
        }
    }

    fn generation_failed(&mut self, transcript: String, partial: String, error: Error) -> RoundOutcome {
        self.show_error(&error);
        RoundOutcome::GenerationFailed {
            transcript,
            partial,
            error,
        }
    }
}
