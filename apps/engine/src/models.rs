//! Input contract with the document-extraction layer.
//!
//! Extraction itself (PDF/DOCX parsing) lives outside this crate; the
//! engine only consumes the text and metadata an extractor produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ExtractionError;

/// Declared document format, parsed from the uploaded file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Maps a file extension (case-insensitive) to a supported format.
    pub fn from_extension(extension: &str) -> Result<Self, ExtractionError> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn is_plain_text(&self) -> bool {
        matches!(self, Self::Txt)
    }
}

/// A metadata timestamp as extractors hand it over: either an already
/// structured datetime (DOCX core properties) or a raw string (PDF info
/// dictionary, `D:YYYYMMDDHHMMSS...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataDate {
    Timestamp(DateTime<Utc>),
    Text(String),
}

/// Structural metadata of the source document.
/// Any field an extractor could not recover is simply `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub format: DocumentKind,
    pub creation_date: Option<MetadataDate>,
    pub modification_date: Option<MetadataDate>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub title: Option<String>,
    pub page_count: Option<usize>,
}

impl DocumentMetadata {
    /// A metadata record with nothing but the declared format, the shape
    /// a plain-text upload arrives in.
    pub fn bare(format: DocumentKind) -> Self {
        Self {
            format,
            creation_date: None,
            modification_date: None,
            author: None,
            creator: None,
            producer: None,
            title: None,
            page_count: None,
        }
    }
}

/// Output of the external extraction step: the document text plus
/// whatever structural metadata the format carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(DocumentKind::from_extension("pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("DOCX").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_extension("txt").unwrap(), DocumentKind::Txt);
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = DocumentKind::from_extension("exe").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref ext) if ext == "exe"));
    }

    #[test]
    fn test_metadata_date_deserializes_both_shapes() {
        let structured: MetadataDate = serde_json::from_str("\"2024-01-01T12:00:00Z\"").unwrap();
        assert!(matches!(structured, MetadataDate::Timestamp(_)));

        let raw: MetadataDate = serde_json::from_str("\"D:20240101120000+05'00'\"").unwrap();
        assert!(matches!(raw, MetadataDate::Text(_)));
    }
}
