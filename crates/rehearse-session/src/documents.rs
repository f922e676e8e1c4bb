//! Document store: uploaded reference texts folded into one context blob.

use crate::extract::TextExtractor;

#[derive(Debug, Clone)]
struct DocumentSlot {
    label: String,
    text: String,
}

/// Holds per-slot extracted texts and the concatenated document context.
///
/// Slots keep the position of their first upload. Re-ingesting a slot
/// replaces its text in place, so the context never accumulates duplicates.
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    slots: Vec<DocumentSlot>,
    context: String,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract `bytes` with `extractor` and store the result under `label`.
    ///
    /// Returns the extracted text. Unreadable units are skipped. With no
    /// extractor this is a no-op that returns an empty string. An extraction
    /// that produces no text leaves the slot's previous contribution alone.
    pub fn ingest(
        &mut self,
        label: &str,
        bytes: &[u8],
        extractor: Option<&dyn TextExtractor>,
    ) -> String {
        let Some(extractor) = extractor else {
            tracing::debug!(slot = label, "No text extractor available, ignoring upload");
            return String::new();
        };

        let mut parts = Vec::new();
        for unit in extractor.extract(bytes) {
            match unit {
                Ok(text) => parts.push(text),
                Err(e) => {
                    tracing::debug!(slot = label, extractor = extractor.name(), "Skipping unit: {}", e);
                }
            }
        }
        let text = parts.join("\n").trim().to_string();

        if text.is_empty() {
            tracing::warn!(slot = label, "Upload produced no text; keeping previous contents");
            return text;
        }

        self.set_text(label, &text);
        text
    }

    /// Store already-extracted text under `label`, replacing that slot.
    pub fn set_text(&mut self, label: &str, text: &str) {
        let label = label.trim();
        let text = text.trim().to_string();

        match self.slots.iter_mut().find(|s| s.label == label) {
            Some(slot) => slot.text = text,
            None => self.slots.push(DocumentSlot {
                label: label.to_string(),
                text,
            }),
        }

        self.rebuild();
        tracing::debug!(slot = label, context_chars = self.context.chars().count(), "Document context updated");
    }

    /// Drop a slot's contribution. Returns whether it existed.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.label != label.trim());
        let removed = self.slots.len() != before;
        if removed {
            self.rebuild();
        }
        removed
    }

    /// The concatenated, trimmed document context
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    /// Slot labels with their text length in characters, in upload order
    pub fn slots(&self) -> impl Iterator<Item = (&str, usize)> {
        self.slots
            .iter()
            .map(|s| (s.label.as_str(), s.text.chars().count()))
    }

    fn rebuild(&mut self) {
        self.context = self
            .slots
            .iter()
            .filter(|s| !s.text.is_empty())
            .map(|s| format!("=== {} ===\n{}", s.label, s.text))
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::extract::PlainTextExtractor;

    /// Yields fixed units, some of them failing
    struct PagedExtractor(Vec<Result<&'static str, &'static str>>);

    impl TextExtractor for PagedExtractor {
        fn name(&self) -> &'static str {
            "paged"
        }

        fn extract(&self, _bytes: &[u8]) -> Vec<Result<String, ExtractionError>> {
            self.0
                .iter()
                .enumerate()
                .map(|(i, r)| match r {
                    Ok(t) => Ok(t.to_string()),
                    Err(m) => Err(ExtractionError::new(i, *m)),
                })
                .collect()
        }
    }

    #[test]
    fn test_single_slot_label_format() {
        let mut store = DocumentStore::new();
        let text = store.ingest("Resume 1", b"  Skilled in VLSI \n", Some(&PlainTextExtractor));
        assert_eq!(text, "Skilled in VLSI");
        assert_eq!(store.context(), "=== Resume 1 ===\nSkilled in VLSI");
    }

    #[test]
    fn test_slots_joined_in_upload_order() {
        let mut store = DocumentStore::new();
        store.ingest("Resume 1", b"VLSI", Some(&PlainTextExtractor));
        store.ingest("Important Points", b"Mention tapeout", Some(&PlainTextExtractor));
        assert_eq!(
            store.context(),
            "=== Resume 1 ===\nVLSI\n\n=== Important Points ===\nMention tapeout"
        );
    }

    #[test]
    fn test_reingest_replaces_in_place() {
        let mut store = DocumentStore::new();
        store.ingest("Resume 1", b"old", Some(&PlainTextExtractor));
        store.ingest("Notes", b"notes", Some(&PlainTextExtractor));
        store.ingest("Resume 1", b"new", Some(&PlainTextExtractor));

        assert_eq!(store.context(), "=== Resume 1 ===\nnew\n\n=== Notes ===\nnotes");
        assert_eq!(store.context().matches("=== Resume 1 ===").count(), 1);
        assert_eq!(store.slots().count(), 2);
    }

    #[test]
    fn test_same_upload_twice_is_idempotent() {
        let mut store = DocumentStore::new();
        store.ingest("Resume 1", b"same", Some(&PlainTextExtractor));
        let first = store.context().to_string();
        store.ingest("Resume 1", b"same", Some(&PlainTextExtractor));
        assert_eq!(store.context(), first);
    }

    #[test]
    fn test_failed_units_are_skipped() {
        let mut store = DocumentStore::new();
        let extractor = PagedExtractor(vec![Ok("page one"), Err("broken xref"), Ok("page three")]);
        let text = store.ingest("Resume 1", b"%PDF", Some(&extractor));
        assert_eq!(text, "page one\npage three");
    }

    #[test]
    fn test_all_units_failing_keeps_previous() {
        let mut store = DocumentStore::new();
        store.ingest("Resume 1", b"kept", Some(&PlainTextExtractor));
        let extractor = PagedExtractor(vec![Err("encrypted")]);
        let text = store.ingest("Resume 1", b"%PDF", Some(&extractor));
        assert!(text.is_empty());
        assert_eq!(store.context(), "=== Resume 1 ===\nkept");
    }

    #[test]
    fn test_missing_extractor_is_noop() {
        let mut store = DocumentStore::new();
        let text = store.ingest("Resume 1", b"%PDF-1.7", None);
        assert!(text.is_empty());
        assert!(store.is_empty());
        assert_eq!(store.slots().count(), 0);
    }

    #[test]
    fn test_remove_slot() {
        let mut store = DocumentStore::new();
        store.set_text("A", "alpha");
        store.set_text("B", "beta");
        assert!(store.remove("A"));
        assert!(!store.remove("A"));
        assert_eq!(store.context(), "=== B ===\nbeta");
    }

    #[test]
    fn test_slot_char_counts() {
        let mut store = DocumentStore::new();
        store.set_text("Résumé", "né");
        let slots: Vec<_> = store.slots().collect();
        assert_eq!(slots, vec![("Résumé", 2)]);
    }
}
