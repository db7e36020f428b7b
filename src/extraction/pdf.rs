//! Page-level PDF text extraction.

use std::panic::{AssertUnwindSafe, catch_unwind};

use pdf_extract::{Document, PlainTextOutput};

use super::types::PdfParseError;
use crate::fault::panic_message;

/// Parses raw PDF bytes into the text of each page, in page order.
///
/// A page without extractable text is returned as an empty string; only structural parse
/// failures are reported as errors.
pub trait PdfPageSource: Send + Sync {
    /// Extract the text of every page in `bytes`.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, PdfParseError>;
}

/// [`PdfPageSource`] backed by the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractPages;

impl PdfExtractPages {
    /// Construct the default page source.
    pub const fn new() -> Self {
        Self
    }
}

impl PdfPageSource for PdfExtractPages {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, PdfParseError> {
        // pdf-extract can panic on malformed fonts and glyph tables.
        match catch_unwind(AssertUnwindSafe(|| read_pages(bytes))) {
            Ok(Ok(pages)) => {
                tracing::debug!(page_count = pages.len(), "Parsed PDF pages");
                Ok(pages)
            }
            Ok(Err(error)) => Err(error),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(%message, "PDF parser panicked");
                Err(PdfParseError::Aborted(message))
            }
        }
    }
}

/// Text of every page, in page order.
///
/// Pages are walked one by one so a failing page is reported instead of silently ending
/// the document early, which is what `pdf_extract::extract_text_from_mem_by_pages` does.
fn read_pages(bytes: &[u8]) -> Result<Vec<String>, PdfParseError> {
    let mut document =
        Document::load_mem(bytes).map_err(|error| PdfParseError::Malformed(error.to_string()))?;
    if document.is_encrypted() {
        document
            .decrypt("")
            .map_err(|error| PdfParseError::Malformed(format!("encrypted document: {error}")))?;
    }

    document
        .get_pages()
        .into_keys()
        .map(|page| -> Result<String, PdfParseError> {
            let mut text = String::new();
            let mut output = PlainTextOutput::new(&mut text);
            pdf_extract::output_doc_page(&document, &mut output, page)
                .map_err(|error| PdfParseError::Malformed(format!("page {page}: {error}")))?;
            drop(output);
            Ok(text)
        })
        .collect()
}
