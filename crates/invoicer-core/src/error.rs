//! Error types for the invoicer-core library.

use thiserror::Error;

/// Main error type for the invoicer library.
#[derive(Error, Debug)]
pub enum InvoicerError {
    /// Text source failure, passed through as produced.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Supplier resolution or scanning error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a text source while linearizing a document.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document could not be read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to supplier resolution and invoice scanning.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The supplier identifier has no registered strategy.
    #[error("supplier {0:?} is not supported")]
    UnsupportedSupplier(String),

    /// A scan found its anchor but never reached its terminal condition.
    #[error("unrecoverable parse error for {supplier} ({stage}): {reason}")]
    Unrecoverable {
        supplier: String,
        stage: &'static str,
        limit: usize,
        reason: ScanFailure,
    },

    /// Extraction settings are unusable.
    #[error("invalid extraction config: {0}")]
    InvalidConfig(String),
}

impl ExtractionError {
    /// True for the runaway-scan guard.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(self, ExtractionError::Unrecoverable { .. })
    }
}

/// Why a bounded scan gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    /// More lines were consumed than the iteration ceiling allows.
    LimitExceeded { last_line: String },
    /// The document ended before the terminal condition.
    EndOfInput,
    /// The table closed while an item was still being assembled.
    TableEnded { pending: String },
}

impl std::fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanFailure::LimitExceeded { last_line } => {
                write!(f, "iteration ceiling exceeded at {:?}", last_line)
            }
            ScanFailure::EndOfInput => write!(f, "ran out of lines before the table ended"),
            ScanFailure::TableEnded { pending } => {
                write!(f, "table ended inside item {:?}", pending)
            }
        }
    }
}

/// Result type for the invoicer library.
pub type Result<T> = std::result::Result<T, InvoicerError>;
