//! Text sources: turn a document into the ordered line stream the strategies scan.

mod extractor;

pub use extractor::PdfTextSource;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Result type for text source operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Produces the visible text of a document, one logical line per string.
///
/// Implementations must be deterministic and return an empty vector for a
/// document with no text. Unreadable input is an error.
pub trait TextSource: Send + Sync {
    /// Extract the document's lines, page by page, concatenated.
    fn extract_lines(&self, path: &Path) -> Result<Vec<String>>;
}

/// Which text source a registered supplier reads through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSourceKind {
    /// Text layer of a PDF file.
    Pdf,
    /// Already-linearized UTF-8 text file.
    PlainText,
}

impl TextSourceKind {
    /// Build the source this selector names.
    pub fn source(&self, config: &PdfConfig) -> Box<dyn TextSource> {
        match self {
            TextSourceKind::Pdf => Box::new(PdfTextSource::new(config.clone())),
            TextSourceKind::PlainText => Box::new(PlainTextSource),
        }
    }
}

/// Reads a text file that was linearized elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract_lines(&self, path: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(path)?;
        let lines = linearize(&[text]);
        debug!("Read {} lines from {}", lines.len(), path.display());
        Ok(lines)
    }
}

/// Serves a fixed set of lines regardless of the path asked for.
#[derive(Debug, Default)]
pub struct StaticTextSource {
    lines: Vec<String>,
    calls: AtomicUsize,
}

impl StaticTextSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `extract_lines` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextSource for StaticTextSource {
    fn extract_lines(&self, _path: &Path) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lines.clone())
    }
}

/// Join page texts and split them into trimmed, non-blank lines.
pub fn linearize<S: AsRef<str>>(pages: &[S]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.as_ref().lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
