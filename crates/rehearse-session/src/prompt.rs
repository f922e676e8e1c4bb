//! Prompt assembly: persona, document context, then history.

use std::borrow::Cow;

use rehearse_ai::Message;

/// Default candidate persona sent as the first system message
pub const DEFAULT_PERSONA: &str = "\
You are role-playing as a human job candidate in a live interview.
Speak naturally and conversationally—never mention you are an AI or that you lack opinions.
Aim for the tone and knowledge of an M.Tech (Electronics) graduate: practical, down-to-earth, and clear.
When relevant, use the STAR method (Situation, Task, Action, Result) to explain projects/experiences.
Keep answers focused, modest in length, and avoid over-technical jargon unless asked. Every question will be \
related to VLSI, Testing, COA, Digital, Embedded, etc, VLSI design. So if something is not clear or you have \
been asked an ambiguos question, assume in terms of these fields mentioned before.
Always answer to the point, no need to answer extra than what is asked, keep it simple and to the point.

Ground your answers in the candidate's resume context provided to you.";

/// Lead-in for the document context system message
pub const CONTEXT_PREAMBLE: &str = "Resume context (verbatim; use as factual background):\n";

/// Appended when the document context was cut at the character budget
pub const TRUNCATION_MARKER: &str = "\n…[truncated]";

/// Hard ceiling on document context characters per request
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 16_000;

/// Clamp `text` to `max_chars` characters, marking the cut.
pub fn clamp_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
    }
}

/// Builds the ordered message list for one generation request
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_prompt: String,
    max_context_chars: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA, DEFAULT_MAX_CONTEXT_CHARS)
    }
}

impl PromptAssembler {
    pub fn new(system_prompt: impl Into<String>, max_context_chars: usize) -> Self {
        Self {
            system_prompt: system_prompt.into().trim().to_string(),
            max_context_chars,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// `[persona, (context if any), ...history]`. History is copied verbatim.
    pub fn build_messages(&self, history: &[Message], document_context: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt.clone()));

        let context = document_context.trim();
        if !context.is_empty() {
            messages.push(Message::system(format!(
                "{}{}",
                CONTEXT_PREAMBLE,
                clamp_text(context, self.max_context_chars)
            )));
        }

        messages.extend(history.iter().cloned());
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<Message> {
        vec![
            Message::user("What is setup time?"),
            Message::assistant("The minimum time data must be stable before the clock edge."),
            Message::user("And hold time?"),
        ]
    }

    #[test]
    fn test_without_context_one_system_message() {
        let assembler = PromptAssembler::default();
        let messages = assembler.build_messages(&history(), "");
        assert_eq!(messages.iter().filter(|m| m.is_system()).count(), 1);
        assert!(messages[0].is_system());
        assert_eq!(&messages[1..], &history()[..]);
    }

    #[test]
    fn test_whitespace_context_counts_as_empty() {
        let messages = PromptAssembler::default().build_messages(&[], " \n\t ");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_with_context_second_system_message() {
        let assembler = PromptAssembler::default();
        let messages =
            assembler.build_messages(&history(), "=== Resume 1 ===\nSkilled in VLSI");
        assert!(messages[0].is_system());
        assert!(messages[1].is_system());
        assert!(messages[1].content.starts_with(CONTEXT_PREAMBLE));
        assert!(messages[1].content.contains("Skilled in VLSI"));
        assert_eq!(&messages[2..], &history()[..]);
    }

    #[test]
    fn test_persona_is_trimmed_and_first() {
        let assembler = PromptAssembler::new("\n  be brief  \n", 100);
        let messages = assembler.build_messages(&[], "");
        assert_eq!(messages[0].content, "be brief");
    }

    #[test]
    fn test_default_persona_mentions_star_and_resume() {
        assert!(DEFAULT_PERSONA.contains("STAR"));
        assert!(DEFAULT_PERSONA.contains("resume context"));
    }

    #[test]
    fn test_clamp_under_budget_is_borrowed() {
        assert!(matches!(clamp_text("short", 10), Cow::Borrowed("short")));
        assert!(matches!(clamp_text("exactly10!", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_clamp_over_budget() {
        let clamped = clamp_text("abcdefghijk", 10);
        assert_eq!(clamped, format!("abcdefghij{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_clamp_counts_chars_not_bytes() {
        let text = "é".repeat(12);
        let clamped = clamp_text(&text, 10);
        assert!(clamped.starts_with(&"é".repeat(10)));
        assert_eq!(
            clamped.chars().count(),
            10 + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_context_message_bounded() {
        let huge = "x".repeat(DEFAULT_MAX_CONTEXT_CHARS * 3);
        let messages = PromptAssembler::default().build_messages(&[], &huge);
        let body = messages[1].content.strip_prefix(CONTEXT_PREAMBLE).unwrap();
        assert!(
            body.chars().count()
                <= DEFAULT_MAX_CONTEXT_CHARS + TRUNCATION_MARKER.chars().count()
        );
        assert!(body.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_history_not_mutated() {
        let h = history();
        let _ = PromptAssembler::default().build_messages(&h, "ctx");
        assert_eq!(h, history());
    }
}
