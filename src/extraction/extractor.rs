//! Upload-to-text dispatch by declared MIME type.

use super::cleaner::{clean_text, is_valid_text};
use super::pdf::{PdfExtractPages, PdfPageSource};
use super::types::{ContentType, Document, ExtractionError, UploadedFile};
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

/// Returned in place of text when no PDF page yields any extractable text.
pub const SCANNED_PDF_PLACEHOLDER: &str = "Unable to extract readable text from this PDF. The PDF might be scanned or have complex formatting. Please try uploading a TXT file instead.";

/// Returned in place of text when the cleaned PDF text fails the validity check.
pub const CORRUPTED_TEXT_PLACEHOLDER: &str = "The extracted text appears to be incomplete or corrupted. Please try uploading a TXT file instead.";

/// Whether `text` is one of the placeholder messages rather than document content.
pub fn is_placeholder(text: &str) -> bool {
    text == SCANNED_PDF_PLACEHOLDER || text == CORRUPTED_TEXT_PLACEHOLDER
}

/// Converts uploads into cleaned document text.
///
/// Placeholder messages are returned as ordinary text: callers display them as the
/// document content. Only unsupported types, oversize uploads, decode failures, and PDF
/// structural failures are errors.
pub struct DocumentExtractor {
    pages: Box<dyn PdfPageSource>,
    max_upload_bytes: usize,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl DocumentExtractor {
    /// Build an extractor using the `pdf-extract` backed page source.
    pub fn new(max_upload_bytes: usize) -> Self {
        Self::with_page_source(Box::new(PdfExtractPages::new()), max_upload_bytes)
    }

    /// Build an extractor around a custom PDF page source.
    pub fn with_page_source(pages: Box<dyn PdfPageSource>, max_upload_bytes: usize) -> Self {
        Self {
            pages,
            max_upload_bytes,
        }
    }

    /// Extract text from an upload, dispatching on its declared MIME type.
    pub fn extract_text(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        self.dispatch(file).map(|(_, text)| text)
    }

    /// Extract an upload into a [`Document`] carrying the format it was read as.
    pub fn extract_document(&self, file: &UploadedFile) -> Result<Document, ExtractionError> {
        let (content_type, text) = self.dispatch(file)?;
        Ok(Document {
            name: file.name.clone(),
            content_type,
            fingerprint: file.fingerprint(),
            text,
        })
    }

    #[tracing::instrument(
        skip(self, file),
        fields(
            filename = %file.name,
            mime = %file.mime_type,
            size = file.bytes.len(),
        )
    )]
    fn dispatch(&self, file: &UploadedFile) -> Result<(ContentType, String), ExtractionError> {
        let Some(content_type) = ContentType::from_mime(&file.mime_type) else {
            tracing::warn!("Rejected upload with unsupported type");
            return Err(ExtractionError::UnsupportedType(file.mime_type.clone()));
        };

        if file.bytes.len() > self.max_upload_bytes {
            return Err(ExtractionError::TooLarge {
                name: file.name.clone(),
                size: file.bytes.len(),
                limit: self.max_upload_bytes,
            });
        }

        let text = match content_type {
            ContentType::PlainText => extract_plain_text(file)?,
            ContentType::Pdf => self.extract_pdf_text(file)?,
        };
        Ok((content_type, text))
    }

    fn extract_pdf_text(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        let pages = self
            .pages
            .extract_pages(&file.bytes)
            .map_err(|source| ExtractionError::Pdf {
                name: file.name.clone(),
                source,
            })?;

        let page_count = pages.len();
        let text_pages: Vec<String> = pages
            .into_iter()
            .filter(|page| !page.trim().is_empty())
            .collect();
        tracing::info!(
            page_count,
            text_pages = text_pages.len(),
            "PDF text extraction complete"
        );

        if text_pages.is_empty() {
            tracing::warn!("No page produced text; returning scanned-PDF placeholder");
            return Ok(SCANNED_PDF_PLACEHOLDER.to_string());
        }

        let cleaned = clean_text(&text_pages.join("\n"));
        if !is_valid_text(&cleaned) {
            tracing::warn!(
                chars = cleaned.chars().count(),
                "Cleaned PDF text failed validation; returning corrupted-text placeholder"
            );
            return Ok(CORRUPTED_TEXT_PLACEHOLDER.to_string());
        }

        Ok(cleaned)
    }
}

fn extract_plain_text(file: &UploadedFile) -> Result<String, ExtractionError> {
    let text = String::from_utf8(file.bytes.clone()).map_err(|source| ExtractionError::Decode {
        name: file.name.clone(),
        source,
    })?;
    tracing::info!(chars = text.chars().count(), "Plain text extraction complete");
    Ok(text.trim().to_string())
}
