//! Per-session state: documents, history, round phase and display.

use crate::{documents::DocumentStore, history::History};

/// Where the current round is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundPhase {
    /// Waiting for the user to start recording
    #[default]
    Idle,
    /// Audio is being captured
    Recording,
    /// Transcribing and generating
    Processing,
}

/// What the user currently sees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Display {
    /// Last transcribed question
    pub transcript: String,
    /// Answer text so far (final answer once the round ends)
    pub answer: String,
    /// Error banner for a failed round
    pub error: Option<String>,
}

impl Display {
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.answer.clear();
        self.error = None;
    }

    pub fn is_blank(&self) -> bool {
        self.transcript.is_empty() && self.answer.is_empty() && self.error.is_none()
    }
}

/// All state for one user's rehearsal session
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub documents: DocumentStore,
    pub history: History,
    pub phase: RoundPhase,
    pub display: Display,
    /// Display already cleared for the round in progress
    pub cleared: bool,
}

impl Session {
    /// Fresh session with the given history window
    pub fn new(history_window: usize) -> Self {
        Self {
            history: History::new(history_window),
            ..Default::default()
        }
    }
}
