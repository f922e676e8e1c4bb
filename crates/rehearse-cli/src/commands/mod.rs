//! Slash commands for interactive mode

mod docs;
mod history;
mod upload;

pub use docs::DocsCommand;
pub use history::HistoryCommand;
pub use upload::{UploadCommand, parse_doc_spec};

use rehearse_session::Session;
use std::path::PathBuf;

/// Result of executing a slash command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Forget the conversation, keep documents
    Clear,
    /// Ingest a document into a slot
    Upload { label: String, path: PathBuf },
    /// Run a round on a typed question
    Ask(String),
    /// Show a message to the user
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command
pub fn execute_command(input: &str, session: &Session) -> Option<CommandResult> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = input[1..].splitn(2, ' ').collect();
    let command = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "clear" | "c" => CommandResult::Clear,

        "quit" | "exit" | "q" => CommandResult::Exit,

        "upload" | "u" => UploadCommand::execute(args),

        "ask" | "a" => {
            if args.is_empty() {
                CommandResult::Message("Usage: /ask <question>".to_string())
            } else {
                CommandResult::Ask(args.to_string())
            }
        }

        "docs" | "d" => DocsCommand::execute(session),

        "history" => HistoryCommand::execute(session),

        _ => CommandResult::Unknown(command),
    })
}

fn help_message() -> String {
    r#"Enter the path of a recorded question (e.g. question.wav) to run a round.

Available commands:
  /help, /h, /?              Show this help message
  /upload, /u LABEL=PATH     Upload a resume or notes file into a slot
  /ask, /a <question>        Ask a typed question instead of a recording
  /docs, /d                  Show uploaded documents
  /history                   Show the conversation since the last reset
  /clear, /c                 Forget the conversation (documents stay)
  /quit, /exit, /q           Exit rehearse

Examples:
  /upload Resume 1=~/cv.pdf
  /upload Important Points notes.md
  /ask Tell me about your final-year project"#
        .to_string()
}
