//! Entry points: resolve a supplier, then construct its parser.

use std::path::Path;

use tracing::debug;

use super::parser::SupplierParser;
use super::registry::registry;
use crate::models::config::{ExtractionConfig, InvoicerConfig};
use crate::pdf::TextSource;
use crate::Result;

/// Parse `path` as an invoice from `supplier_id` with default settings.
///
/// The returned parser holds the document text; call
/// [`SupplierParser::process_invoice`] to extract the fields.
pub fn parse(path: impl AsRef<Path>, supplier_id: &str) -> Result<SupplierParser> {
    parse_with(path, supplier_id, &InvoicerConfig::default())
}

/// Like [`parse`], reading through the supplier's registered text source
/// configured by `config`.
pub fn parse_with(
    path: impl AsRef<Path>,
    supplier_id: &str,
    config: &InvoicerConfig,
) -> Result<SupplierParser> {
    let descriptor = registry().resolve(supplier_id)?;
    debug!(
        "Dispatching {} to {} via {:?}",
        path.as_ref().display(),
        descriptor.supplier,
        descriptor.text_source
    );

    let source = descriptor.text_source.source(&config.pdf);
    parse_with_source(path, supplier_id, source.as_ref(), &config.extraction)
}

/// Like [`parse`], reading through an injected text source.
pub fn parse_with_source(
    path: impl AsRef<Path>,
    supplier_id: &str,
    source: &dyn TextSource,
    config: &ExtractionConfig,
) -> Result<SupplierParser> {
    SupplierParser::new(path.as_ref(), supplier_id, source, config)
}
