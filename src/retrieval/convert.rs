//! PDF-to-text conversion with a page bound.
//!
//! The byte buffer is opened with `lopdf`, pages past the cap are deleted,
//! and text is extracted from the truncated document with `pdf-extract`.
//! Truncation happens before extraction so conversion cost stays
//! proportional to the page cap, not the document size.

use lopdf::Document;

/// Errors that can occur during PDF conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The bytes are not a well-formed PDF
    #[error("malformed PDF document: {0}")]
    Malformed(String),

    /// The PDF loaded but text extraction failed
    #[error("text extraction failed: {0}")]
    Extraction(String),
}

/// The DocumentConverter trait turns raw PDF bytes into text.
///
/// "Converted but empty" is a successful result with empty text; only a
/// fault in the document or the extractor is an error.
pub trait DocumentConverter: Send + Sync + std::fmt::Debug {
    /// Extract text from at most the first `max_pages` pages.
    fn convert(&self, bytes: &[u8], max_pages: usize) -> Result<String, ConvertError>;
}

/// Production converter: lopdf page surgery + pdf-extract
#[derive(Debug, Clone, Default)]
pub struct PdfConverter;

impl PdfConverter {
    /// Create a new converter
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for PdfConverter {
    fn convert(&self, bytes: &[u8], max_pages: usize) -> Result<String, ConvertError> {
        let truncated = truncate_pdf(bytes, max_pages)?;

        pdf_extract::extract_text_from_mem(&truncated)
            .map_err(|e| ConvertError::Extraction(e.to_string()))
    }
}

/// Re-serialize a PDF keeping only the first `min(max_pages, total)` pages.
pub fn truncate_pdf(bytes: &[u8], max_pages: usize) -> Result<Vec<u8>, ConvertError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| ConvertError::Malformed(e.to_string()))?;

    let total = doc.get_pages().len();
    let keep = max_pages.min(total);
    if keep < total {
        let dropped: Vec<u32> = (keep as u32 + 1..=total as u32).collect();
        doc.delete_pages(&dropped);
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ConvertError::Malformed(e.to_string()))?;

    Ok(out)
}
