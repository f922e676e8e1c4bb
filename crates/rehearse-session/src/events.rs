//! Round event types

use serde::{Deserialize, Serialize};

/// Events emitted while a round runs, for whatever renders the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    /// Capture began; the display was cleared
    RecordingStarted,

    /// Transcript, answer and error areas were cleared for a new round
    DisplayCleared,

    /// The question was transcribed (or typed)
    Transcript { text: String },

    /// A fragment of the streamed answer
    AnswerDelta { delta: String },

    /// The final, trimmed answer
    AnswerEnd { answer: String },

    /// The history window filled up and was cleared
    WindowReset,

    /// The round failed; `message` is the user-facing banner
    Error { message: String },

    /// The round finished, successfully or not
    RoundEnd,
}

impl RoundEvent {
    /// Check if this is a terminal event
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundEvent::RoundEnd)
    }
}
