//! /docs command - show uploaded documents

use super::CommandResult;
use rehearse_session::Session;

pub struct DocsCommand;

impl DocsCommand {
    pub fn execute(session: &Session) -> CommandResult {
        let documents = &session.documents;
        if documents.is_empty() {
            return CommandResult::Message(
                "No documents uploaded. Use /upload LABEL=PATH".to_string(),
            );
        }

        let mut output = String::from("Documents\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        for (label, chars) in documents.slots() {
            output.push_str(&format!("  {:<24} {:>7} chars\n", label, chars));
        }
        output.push_str(&format!(
            "\nContext: {} chars",
            documents.context().chars().count()
        ));

        CommandResult::Message(output)
    }
}
