//! Document extraction pipeline: MIME dispatch, PDF page parsing, and text cleaning.

pub mod cleaner;
mod extractor;
pub mod pdf;
pub mod types;

pub use cleaner::{clean_text, is_valid_text, meaningful_char_count};
pub use extractor::{
    CORRUPTED_TEXT_PLACEHOLDER, DocumentExtractor, SCANNED_PDF_PLACEHOLDER, is_placeholder,
};
pub use pdf::{PdfExtractPages, PdfPageSource};
pub use types::{ContentType, Document, ExtractionError, PdfParseError, UploadedFile};
