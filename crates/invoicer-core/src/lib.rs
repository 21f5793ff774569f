//! Core library for supplier invoice parsing.
//!
//! This crate provides:
//! - Text sources that linearize a document into ordered lines (PDF, plain text)
//! - A static registry of supported suppliers and their parsing strategies
//! - Bounded line-scanning strategies for each supplier layout
//! - A normalized order record (items, monetary summary, order metadata)
//!
//! ```no_run
//! let mut parser = invoicer_core::parse("order.pdf", "Soak Rochford")?;
//! let invoice = parser.process_invoice()?;
//! println!("{}: {:?}", invoice, invoice.summary());
//! # Ok::<(), invoicer_core::InvoicerError>(())
//! ```

pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use error::{ExtractionError, InvoicerError, PdfError, Result, ScanFailure};
pub use invoice::{
    parse, parse_with, parse_with_source, registry, supported_suppliers, ParseState,
    SupplierParser, SupplierStrategy,
};
pub use models::config::{ExtractionConfig, InvoicerConfig, PdfConfig};
pub use models::invoice::{
    InvoiceRecord, InvoiceSummary, Items, LineItem, OrderMetadata, ParsedInvoice, PriceBasis,
    Supplier, SummaryField,
};
pub use pdf::{PdfTextSource, PlainTextSource, StaticTextSource, TextSource, TextSourceKind};
