//! /history command - show the conversation since the last reset

use super::CommandResult;
use crate::utils::truncate_chars;
use rehearse_session::Session;

pub struct HistoryCommand;

impl HistoryCommand {
    pub fn execute(session: &Session) -> CommandResult {
        let history = &session.history;

        let mut output = format!(
            "Round {}/{} ({} turns)\n",
            history.rounds(),
            history.window_size(),
            history.len()
        );
        output.push_str(&"-".repeat(40));

        for (i, turn) in history.turns().iter().enumerate() {
            let preview = truncate_chars(&turn.content.replace('\n', " "), 72);
            output.push_str(&format!("\n  {}: [{}] {}", i, turn.role.as_str(), preview));
        }
        if history.has_dangling_user_turn() {
            output.push_str("\n  (last question has no answer)");
        }

        CommandResult::Message(output)
    }
}
