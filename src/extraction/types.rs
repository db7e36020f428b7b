//! Core data types and error definitions for document extraction.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::string::FromUtf8Error;
use thiserror::Error;

/// Document formats the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Portable Document Format.
    Pdf,
    /// UTF-8 plain text.
    PlainText,
}

impl ContentType {
    /// Map a declared MIME type onto a supported format.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "text/plain" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Canonical MIME type for the format.
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
        }
    }
}

/// A file handed over by the hosting shell: declared MIME type plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Display name of the upload, usually the original filename.
    pub name: String,
    /// MIME type declared by the uploader; not sniffed from the content.
    pub mime_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create a new upload from its parts.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Hex SHA-256 of the raw bytes, stable across re-uploads of the same file.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// A processed document held by the session for its whole lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Name of the upload the text came from.
    pub name: String,
    /// Format the text was extracted from.
    pub content_type: ContentType,
    /// Hex SHA-256 of the uploaded bytes.
    pub fingerprint: String,
    /// Cleaned text, or one of the extraction placeholder messages.
    pub text: String,
}

/// Errors raised by the PDF parsing primitive.
#[derive(Debug, Error)]
pub enum PdfParseError {
    /// The bytes could not be parsed as a PDF document.
    #[error("{0}")]
    Malformed(String),
    /// The parser aborted while decoding the document (typically a broken font program).
    #[error("the PDF parser aborted: {0}")]
    Aborted(String),
}

/// Errors emitted while turning an upload into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The declared MIME type is not one the extractor supports.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    /// The PDF structure could not be parsed.
    #[error("Error reading PDF '{name}': {source}. Please try uploading a TXT file instead.")]
    Pdf {
        /// Name of the offending upload.
        name: String,
        /// Underlying parser failure.
        #[source]
        source: PdfParseError,
    },
    /// A plain-text upload was not valid UTF-8.
    #[error("Error reading TXT file '{name}': {source}")]
    Decode {
        /// Name of the offending upload.
        name: String,
        /// Underlying decode failure.
        #[source]
        source: FromUtf8Error,
    },
    /// The upload exceeds the configured size limit.
    #[error("File '{name}' is {size} bytes, above the {limit} byte upload limit")]
    TooLarge {
        /// Name of the offending upload.
        name: String,
        /// Size of the upload in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_maps_supported_mimes() {
        assert_eq!(ContentType::from_mime("application/pdf"), Some(ContentType::Pdf));
        assert_eq!(ContentType::from_mime(" Text/Plain "), Some(ContentType::PlainText));
        assert_eq!(ContentType::from_mime("application/json"), None);
        assert_eq!(ContentType::PlainText.as_mime(), "text/plain");
    }

    #[test]
    fn fingerprint_is_deterministic_hex() {
        let first = UploadedFile::new("a.txt", "text/plain", b"hello".to_vec());
        let second = UploadedFile::new("b.txt", "text/plain", b"hello".to_vec());
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);
    }

    #[test]
    fn unsupported_type_error_names_the_mime() {
        let error = ExtractionError::UnsupportedType("application/json".into());
        assert_eq!(error.to_string(), "Unsupported file type: application/json");
    }
}
