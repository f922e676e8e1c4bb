//! Text extraction for uploaded reference documents.
//!
//! Extraction is best-effort and unit-based: each page (or the whole file for
//! plain text) yields its own result so one unreadable page never sinks the
//! rest of the document.

use std::path::Path;

use crate::error::ExtractionError;

/// Turns raw document bytes into per-unit text
pub trait TextExtractor: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Extract every unit in document order. A document that cannot be opened
    /// at all is reported as a single failed unit.
    fn extract(&self, bytes: &[u8]) -> Vec<Result<String, ExtractionError>>;
}

/// UTF-8 notes and text files; invalid sequences are replaced, never fatal
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, bytes: &[u8]) -> Vec<Result<String, ExtractionError>> {
        vec![Ok(String::from_utf8_lossy(bytes).into_owned())]
    }
}

/// Per-page PDF extraction
#[cfg(feature = "pdf")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, bytes: &[u8]) -> Vec<Result<String, ExtractionError>> {
        let document = match lopdf::Document::load_mem(bytes) {
            Ok(doc) => doc,
            Err(e) => return vec![Err(ExtractionError::new(0, format!("unreadable PDF: {}", e)))],
        };

        document
            .get_pages()
            .keys()
            .enumerate()
            .map(|(index, &page_number)| {
                document
                    .extract_text(&[page_number])
                    .map_err(|e| ExtractionError::new(index, e.to_string()))
            })
            .collect()
    }
}

/// Whether this build can read PDF uploads
pub const fn pdf_supported() -> bool {
    cfg!(feature = "pdf")
}

/// Pick an extractor from a file's extension. `None` means the capability is
/// absent for this kind of file (e.g. a PDF in a build without PDF support).
pub fn extractor_for_path(path: &Path) -> Option<Box<dyn TextExtractor>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => pdf_extractor(),
        Some("txt") | Some("md") | Some("markdown") | Some("text") | None => {
            Some(Box::new(PlainTextExtractor))
        }
        Some(_) => None,
    }
}

#[cfg(feature = "pdf")]
fn pdf_extractor() -> Option<Box<dyn TextExtractor>> {
    Some(Box::new(PdfExtractor))
}

#[cfg(not(feature = "pdf"))]
fn pdf_extractor() -> Option<Box<dyn TextExtractor>> {
    None
}
