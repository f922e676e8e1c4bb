//! Rolling interview history with a hard reset window.
//!
//! History holds alternating user/assistant turns. After every completed
//! round the round counter is bumped; when it reaches the window size the
//! whole history is dropped and counting starts over. This bounds prompt
//! growth without summarization.

use rehearse_ai::Message;

/// Completed rounds kept before the history resets
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// What committing a finished round did to the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Round recorded; `rounds` completed rounds are now in the window
    Kept { rounds: usize },
    /// Window was full, history and round counter were cleared
    WindowReset,
}

impl CommitOutcome {
    pub fn is_reset(&self) -> bool {
        matches!(self, CommitOutcome::WindowReset)
    }
}

#[derive(Debug, Clone)]
pub struct History {
    turns: Vec<Message>,
    rounds: usize,
    window: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl History {
    /// Create an empty history. A window of zero is treated as one.
    pub fn new(window: usize) -> Self {
        Self {
            turns: Vec::new(),
            rounds: 0,
            window: window.max(1),
        }
    }

    /// Append a user turn (a transcribed or typed question).
    ///
    /// A user turn following another user turn is kept: the earlier one is
    /// the question of a round whose generation failed.
    pub fn push_user(&mut self, text: impl Into<String>) {
        if self.has_dangling_user_turn() {
            tracing::warn!("Previous question never got an answer; keeping it in history");
        }
        self.turns.push(Message::user(text));
    }

    /// Record the answer to the pending user turn and close the round.
    /// This is the assistant append: no other path adds an assistant turn.
    pub fn commit_answer(&mut self, answer: impl Into<String>) -> CommitOutcome {
        debug_assert!(
            self.has_dangling_user_turn(),
            "assistant turn must follow a user turn"
        );
        self.turns.push(Message::assistant(answer));
        self.finish_round()
    }

    /// Record a full question/answer pair and close the round.
    pub fn commit_exchange(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> CommitOutcome {
        self.push_user(question);
        self.commit_answer(answer)
    }

    fn finish_round(&mut self) -> CommitOutcome {
        self.rounds += 1;
        if self.rounds >= self.window {
            tracing::debug!(window = self.window, "History window full, resetting");
            self.clear();
            CommitOutcome::WindowReset
        } else {
            CommitOutcome::Kept {
                rounds: self.rounds,
            }
        }
    }

    /// Drop all turns and reset the round counter
    pub fn clear(&mut self) {
        self.turns.clear();
        self.rounds = 0;
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Completed rounds since the last reset
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn window_size(&self) -> usize {
        self.window
    }

    /// Whether the newest turn is a question with no answer yet
    pub fn has_dangling_user_turn(&self) -> bool {
        self.turns.last().is_some_and(|m| m.is_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_exchange_appends_pair() {
        let mut history = History::default();
        let outcome = history.commit_exchange("What is a latch?", "A level-sensitive storage element.");
        assert_eq!(outcome, CommitOutcome::Kept { rounds: 1 });
        assert_eq!(history.len(), 2);
        assert!(history.turns()[0].is_user());
        assert!(history.turns()[1].is_assistant());
    }

    #[test]
    fn test_push_user_then_commit_answer() {
        let mut history = History::default();
        history.push_user("Explain DFT");
        assert!(history.has_dangling_user_turn());
        history.commit_answer("Design for testability adds scan chains.");
        assert!(!history.has_dangling_user_turn());
        assert_eq!(history.rounds(), 1);
        assert_eq!(
            history.turns().last(),
            Some(&Message::assistant("Design for testability adds scan chains."))
        );
    }

    #[test]
    fn test_tenth_round_resets() {
        let mut history = History::default();
        for i in 1..10 {
            let outcome = history.commit_exchange(format!("q{}", i), format!("a{}", i));
            assert_eq!(outcome, CommitOutcome::Kept { rounds: i });
            assert_eq!(history.len(), 2 * i);
        }
        let outcome = history.commit_exchange("q10", "a10");
        assert!(outcome.is_reset());
        assert!(history.is_empty());
        assert_eq!(history.rounds(), 0);

        history.commit_exchange("q11", "a11");
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].content, "q11");
    }

    #[test]
    fn test_len_tracks_rounds_modulo_window() {
        let mut history = History::new(3);
        for k in 1..=10usize {
            history.commit_exchange("q", "a");
            assert_eq!(history.len(), 2 * (k % 3));
            assert_eq!(history.rounds(), k % 3);
        }
    }

    #[test]
    fn test_window_of_one_resets_every_round() {
        let mut history = History::new(1);
        assert!(history.commit_exchange("q", "a").is_reset());
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_window_clamped() {
        assert_eq!(History::new(0).window_size(), 1);
    }

    #[test]
    fn test_dangling_question_survives() {
        let mut history = History::default();
        history.push_user("unanswered");
        history.push_user("second try");
        history.commit_answer("answer");
        let roles: Vec<_> = history.turns().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                rehearse_ai::Role::User,
                rehearse_ai::Role::User,
                rehearse_ai::Role::Assistant
            ]
        );
        assert_eq!(history.rounds(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.commit_exchange("q", "a");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.rounds(), 0);
    }
}
