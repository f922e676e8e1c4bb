//! rehearse-ai: speech-to-text and streaming chat provider clients
//!
//! This crate provides a common interface for OpenAI-compatible providers
//! (Groq, OpenAI, self-hosted gateways): streamed chat completions and
//! audio transcription.

pub mod error;
pub mod http;
pub mod models;
pub mod providers;
pub mod stream;
pub mod types;

pub use error::{Error, Result};
pub use stream::{MessageEvent, MessageEventStream};
pub use types::*;
