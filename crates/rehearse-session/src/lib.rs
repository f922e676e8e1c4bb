//! rehearse-session: interview rehearsal engine
//!
//! This crate owns a rehearsal session: uploaded reference documents, the
//! rolling question/answer history, prompt assembly, and the round lifecycle
//! that turns a finished recording into a streamed answer.

pub mod answer;
pub mod documents;
pub mod error;
pub mod events;
pub mod extract;
pub mod history;
pub mod prompt;
pub mod rehearsal;
pub mod session;

pub use answer::AnswerStream;
pub use documents::DocumentStore;
pub use error::{Error, ExtractionError, Result};
pub use events::RoundEvent;
pub use extract::{PlainTextExtractor, TextExtractor, extractor_for_path, pdf_supported};
#[cfg(feature = "pdf")]
pub use extract::PdfExtractor;
pub use history::{CommitOutcome, History};
pub use prompt::PromptAssembler;
pub use rehearsal::{Rehearsal, RoundOutcome, SessionConfig};
pub use session::{Display, RoundPhase, Session};
