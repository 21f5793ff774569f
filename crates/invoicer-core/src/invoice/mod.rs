//! Supplier invoice parsing: registry, dispatch, lifecycle, and strategies.

mod dispatch;
mod parser;
pub mod registry;
pub mod rules;
pub mod scan;
pub mod strategies;

pub use dispatch::{parse, parse_with, parse_with_source};
pub use parser::{ParseState, SupplierParser};
pub use registry::{registry, supported_suppliers, Registry, StrategyDescriptor};

use std::fmt::Debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{InvoiceSummary, Items, OrderMetadata, Supplier};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A supplier-specific parsing strategy.
///
/// `items_breakdown` and `summary` are required; `metadata` defaults to
/// finding nothing. Each phase reads only the document text and returns its
/// own output, so running them again yields the same result.
pub trait SupplierStrategy: Debug + Send + Sync {
    /// The supplier this strategy parses.
    fn supplier(&self) -> Supplier;

    /// Extract purchased products from the document lines.
    fn items_breakdown(&self, lines: &[String], config: &ExtractionConfig) -> Result<Items>;

    /// Extract the monetary summary from the joined document text.
    fn summary(&self, text: &str) -> InvoiceSummary;

    /// Extract order number, date, and similar fields.
    fn metadata(&self, _text: &str) -> OrderMetadata {
        OrderMetadata::default()
    }
}
