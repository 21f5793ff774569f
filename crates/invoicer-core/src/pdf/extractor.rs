//! PDF text extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace};

use super::{linearize, Result, TextSource};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Text source backed by the PDF text layer.
#[derive(Debug, Clone, Default)]
pub struct PdfTextSource {
    config: PdfConfig,
}

impl PdfTextSource {
    /// Create a new PDF text source.
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Extract the text of each page from an in-memory PDF.
    pub fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // pdf_extract needs the decrypted bytes
        let raw_data = self.unlock(&mut doc)?.unwrap_or_else(|| data.to_vec());

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            debug!("PDF has no pages");
            return Ok(Vec::new());
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(&raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let pages = self.limit_pages(pages);

        debug!("Extracted text from {} of {} pages", pages.len(), page_count);
        Ok(pages)
    }

    /// Decrypt a document protected by an empty password.
    ///
    /// Returns the re-serialized bytes when the document was decrypted and
    /// `None` when it was never encrypted.
    fn unlock(&self, doc: &mut Document) -> Result<Option<Vec<u8>>> {
        if !doc.is_encrypted() {
            return Ok(None);
        }
        if !self.config.try_empty_password || doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted_data = Vec::new();
        doc.save_to(&mut decrypted_data)
            .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
        Ok(Some(decrypted_data))
    }

    /// Drop pages past `max_pages`; 0 keeps every page.
    fn limit_pages(&self, mut pages: Vec<String>) -> Vec<String> {
        let max = self.config.max_pages;
        if max > 0 && pages.len() > max {
            trace!("Truncating {} pages to {}", pages.len(), max);
            pages.truncate(max);
        }
        pages
    }
}

impl TextSource for PdfTextSource {
    fn extract_lines(&self, path: &Path) -> Result<Vec<String>> {
        let data = std::fs::read(path)?;
        let pages = self.extract_pages(&data)?;
        let lines = linearize(&pages);
        debug!("Linearized {} into {} lines", path.display(), lines.len());
        Ok(lines)
    }
}
