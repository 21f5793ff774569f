//! Parse lifecycle: construct (read text), then process (run the phases).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::registry::registry;
use super::{Result, SupplierStrategy};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{Items, ParsedInvoice, Supplier};
use crate::pdf::TextSource;

/// Where a parser is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Lines are loaded; nothing derived yet.
    Constructed,
    /// All three phases have run at least once.
    Processed,
}

/// One document bound to one supplier strategy.
#[derive(Debug)]
pub struct SupplierParser {
    invoice: ParsedInvoice,
    strategy: &'static dyn SupplierStrategy,
    config: ExtractionConfig,
    state: ParseState,
}

impl SupplierParser {
    /// Resolve `supplier_id` and read the document through `source`.
    ///
    /// An unknown supplier fails before the source is touched.
    pub fn new(
        document_ref: impl Into<PathBuf>,
        supplier_id: &str,
        source: &dyn TextSource,
        config: &ExtractionConfig,
    ) -> crate::Result<Self> {
        config.validate()?;
        let descriptor = registry().resolve(supplier_id)?;

        let document_ref = document_ref.into();
        let raw_lines = source.extract_lines(&document_ref)?;
        debug!(
            "Loaded {} lines from {} for {}",
            raw_lines.len(),
            document_ref.display(),
            descriptor.supplier
        );

        Ok(Self {
            invoice: ParsedInvoice::new(document_ref, descriptor.supplier, raw_lines),
            strategy: descriptor.strategy,
            config: config.clone(),
            state: ParseState::Constructed,
        })
    }

    /// Run items breakdown, summary and metadata, in that order.
    ///
    /// Results are committed only when every phase succeeds, so a failed run
    /// leaves the invoice as it was. Running again recomputes the same values.
    pub fn process_invoice(&mut self) -> Result<&ParsedInvoice> {
        let start = Instant::now();
        let lines = self.invoice.raw_lines();

        let items = self.strategy.items_breakdown(lines, &self.config)?;
        let text = lines.join("\n");
        let summary = self.strategy.summary(&text);
        let metadata = self.strategy.metadata(&text);

        self.invoice.apply(items, summary, metadata);
        self.state = ParseState::Processed;

        info!(
            "Processed {} in {}ms: {} items",
            self.invoice,
            start.elapsed().as_millis(),
            self.invoice.items().map_or(0, |items| items.len())
        );
        Ok(&self.invoice)
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn supplier(&self) -> Supplier {
        self.invoice.supplier()
    }

    pub fn document_ref(&self) -> &Path {
        self.invoice.document_ref()
    }

    pub fn raw_lines(&self) -> &[String] {
        self.invoice.raw_lines()
    }

    /// Items, or `None` before processing.
    pub fn items(&self) -> Option<&Items> {
        self.invoice.items()
    }

    /// The five monetary fields as a flat mapping.
    pub fn summary(&self) -> IndexMap<&'static str, Option<Decimal>> {
        self.invoice.summary()
    }

    pub fn order_number(&self) -> Option<&str> {
        self.invoice.order_number()
    }

    pub fn order_date(&self) -> Option<NaiveDate> {
        self.invoice.order_date()
    }

    /// The invoice as parsed so far.
    pub fn invoice(&self) -> &ParsedInvoice {
        &self.invoice
    }

    pub fn into_invoice(self) -> ParsedInvoice {
        self.invoice
    }
}

impl fmt::Display for SupplierParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.invoice, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::error::{ExtractionError, InvoicerError};
    use crate::pdf::StaticTextSource;

    fn soak_rochford_source() -> StaticTextSource {
        StaticTextSource::new([
            "Order No: SR-555",
            "Date: 02/01/2021",
            "SKU Product Quantity Price Total Price",
            "WAX-1 Soy Wax 2 £3.00 £6.00",
            "Subtotal £6.00",
            "Total £7.20",
        ])
    }

    #[test]
    fn test_lifecycle() {
        let source = soak_rochford_source();
        let mut parser = SupplierParser::new(
            "orders/sr-555.pdf",
            "Soak Rochford",
            &source,
            &ExtractionConfig::default(),
        )
        .unwrap();

        assert_eq!(parser.state(), ParseState::Constructed);
        assert!(parser.invoice().items().is_none());
        assert_eq!(parser.to_string(), "Soak Rochford - orders/sr-555.pdf");

        let invoice = parser.process_invoice().unwrap();
        assert_eq!(invoice.items().unwrap().len(), 1);
        assert_eq!(invoice.order_number(), Some("SR-555"));
        assert_eq!(invoice.invoice_summary().total, Some(Decimal::new(720, 2)));

        assert_eq!(parser.state(), ParseState::Processed);
        assert_eq!(parser.to_string(), "2021-01-02 - Soak Rochford");
    }

    #[test]
    fn test_process_twice_is_stable() {
        let source = soak_rochford_source();
        let mut parser =
            SupplierParser::new("a.pdf", "Soak Rochford", &source, &ExtractionConfig::default())
                .unwrap();

        let first = parser.process_invoice().unwrap().clone();
        let second = parser.process_invoice().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_failed_run_commits_nothing() {
        let mut lines = vec![
            "Order No: X".to_string(),
            "SKU Product Quantity Price Total Price".to_string(),
        ];
        lines.extend((0..10).map(|i| format!("SKU{i} Widget {i} 1 £1.00 £1.00")));
        let source = StaticTextSource::new(lines);

        let mut parser = SupplierParser::new(
            "a.pdf",
            "Soak Rochford",
            &source,
            &ExtractionConfig::with_scan_limit(4),
        )
        .unwrap();

        let err = parser.process_invoice().unwrap_err();
        assert!(err.is_unrecoverable());
        assert_eq!(parser.state(), ParseState::Constructed);
        assert!(parser.invoice().items().is_none());
        assert!(parser.invoice().order_number().is_none());
    }

    #[test]
    fn test_unknown_supplier_skips_extraction() {
        let source = soak_rochford_source();
        let err = SupplierParser::new("a.pdf", "Acme", &source, &ExtractionConfig::default())
            .unwrap_err();

        assert!(matches!(
            err,
            InvoicerError::Extraction(ExtractionError::UnsupportedSupplier(_))
        ));
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_zero_scan_limit_rejected() {
        let source = soak_rochford_source();
        let err = SupplierParser::new(
            "a.pdf",
            "Soak Rochford",
            &source,
            &ExtractionConfig::with_scan_limit(0),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            InvoicerError::Extraction(ExtractionError::InvalidConfig(_))
        ));
        assert_eq!(source.calls(), 0);
    }
}
