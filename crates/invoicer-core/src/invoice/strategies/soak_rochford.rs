//! Soak Rochford order invoices.
//!
//! The item table opens with a fixed header row and lists one product per
//! line: `<sku> <name> <qty> £<unit price> £<line total>`. Multi-page invoices
//! repeat the header; the table closes with the `Subtotal` line. Rows that do
//! not match the row pattern (page footers, wrapped artifacts) are skipped.

use tracing::{debug, trace};

use crate::invoice::rules::{
    parse_amount, parse_dmy, SOAK_ROCHFORD_DATE, SOAK_ROCHFORD_DISCOUNT, SOAK_ROCHFORD_HEADER,
    SOAK_ROCHFORD_ORDER_NUMBER, SOAK_ROCHFORD_ROW, SOAK_ROCHFORD_SHIPPING,
    SOAK_ROCHFORD_SUBTOTAL, SOAK_ROCHFORD_TOTAL, SOAK_ROCHFORD_VAT, SOAK_ROCHFORD_WEIGHT,
};
use crate::invoice::scan::{extract_summary, find_anchor, first_capture, squash_whitespace, ScanGuard};
use crate::invoice::{Result, SupplierStrategy};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{
    InvoiceSummary, Items, LineItem, OrderMetadata, PriceBasis, Supplier, SummaryField,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SoakRochford;

impl SoakRochford {
    fn parse_row(line: &str) -> Option<(String, LineItem)> {
        let caps = SOAK_ROCHFORD_ROW.captures(line)?;

        // The weight is sometimes printed twice: "Mica Powder - 25g Weight : 25g"
        let name = SOAK_ROCHFORD_WEIGHT.replace_all(&caps["name"], "");
        let name = squash_whitespace(&name);
        if name.is_empty() {
            return None;
        }

        let item = LineItem {
            quantity: caps["qty"].parse().ok()?,
            price: parse_amount(&caps["total"])?,
            unit_price: parse_amount(&caps["unit"]),
            basis: PriceBasis::ExVat,
        };
        Some((name, item))
    }
}

impl SupplierStrategy for SoakRochford {
    fn supplier(&self) -> Supplier {
        Supplier::SoakRochford
    }

    fn items_breakdown(&self, lines: &[String], config: &ExtractionConfig) -> Result<Items> {
        let mut items = Items::new();
        let mut from = 0;

        while let Some(anchor) = find_anchor(lines, from, |line| line == SOAK_ROCHFORD_HEADER) {
            debug!("Item table header at line {}", anchor);

            let mut guard = ScanGuard::new(self.supplier(), "items", config.scan_limit);
            let mut index = anchor + 1;

            loop {
                let line = guard.consume(lines, index)?;
                if line.starts_with("Subtotal") {
                    break;
                }

                // Header repeated at the top of the next page
                if line != SOAK_ROCHFORD_HEADER {
                    match Self::parse_row(line) {
                        Some((name, item)) => {
                            trace!("Parsed item {:?} x{}", name, item.quantity);
                            items.insert(name, item);
                        }
                        None => debug!("Skipping non-item line {:?}", line),
                    }
                }
                index += 1;
            }

            from = index + 1;
        }

        debug!("Found {} items", items.len());
        Ok(items)
    }

    fn summary(&self, text: &str) -> InvoiceSummary {
        extract_summary(
            text,
            &[
                (SummaryField::Subtotal, &*SOAK_ROCHFORD_SUBTOTAL),
                (SummaryField::Delivery, &*SOAK_ROCHFORD_SHIPPING),
                (SummaryField::Promotion, &*SOAK_ROCHFORD_DISCOUNT),
                (SummaryField::Vat, &*SOAK_ROCHFORD_VAT),
                (SummaryField::Total, &*SOAK_ROCHFORD_TOTAL),
            ],
        )
    }

    fn metadata(&self, text: &str) -> OrderMetadata {
        OrderMetadata {
            order_number: first_capture(&SOAK_ROCHFORD_ORDER_NUMBER, text).map(str::to_string),
            order_date: first_capture(&SOAK_ROCHFORD_DATE, text).and_then(parse_dmy),
        }
    }
}
