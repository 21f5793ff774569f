//! Amazon VAT invoices.
//!
//! The item table opens with a `Description Qty ...` header row. Descriptions
//! wrap freely, so every line that is not a price row is a name fragment; the
//! price row `<qty> £<unit ex VAT> <rate>% £<unit inc VAT> £<subtotal>` closes
//! the item. The table ends at the shipping or totals block.

use tracing::{debug, trace, warn};

use crate::error::ScanFailure;
use crate::invoice::rules::{
    parse_amount, parse_long_date, AMAZON_INVOICE_DATE, AMAZON_INVOICE_HEADER,
    AMAZON_INVOICE_PROMOTION, AMAZON_INVOICE_ROW, AMAZON_INVOICE_SHIPPING,
    AMAZON_INVOICE_SUBTOTAL, AMAZON_INVOICE_TABLE_END, AMAZON_INVOICE_TOTAL, AMAZON_INVOICE_VAT,
    AMAZON_ORDER_NUMBER,
};
use crate::invoice::scan::{extract_summary, find_anchor, first_capture, squash_whitespace, ScanGuard};
use crate::invoice::{Result, SupplierStrategy};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{
    InvoiceSummary, Items, LineItem, OrderMetadata, PriceBasis, Supplier, SummaryField,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonInvoice;

fn is_table_end(line: &str) -> bool {
    AMAZON_INVOICE_TABLE_END
        .iter()
        .any(|token| line.starts_with(token))
}

impl SupplierStrategy for AmazonInvoice {
    fn supplier(&self) -> Supplier {
        Supplier::Amazon
    }

    fn items_breakdown(&self, lines: &[String], config: &ExtractionConfig) -> Result<Items> {
        let mut items = Items::new();
        let mut from = 0;

        while let Some(anchor) =
            find_anchor(lines, from, |line| line.starts_with(AMAZON_INVOICE_HEADER))
        {
            debug!("Item table header at line {}", anchor);

            // One guard per item: the ceiling bounds a single description
            let mut guard = ScanGuard::new(self.supplier(), "items", config.scan_limit);
            let mut fragments: Vec<&str> = Vec::new();
            let mut index = anchor + 1;

            loop {
                let line = guard.consume(lines, index)?;

                if is_table_end(line) {
                    if !fragments.is_empty() {
                        return Err(guard.fail(ScanFailure::TableEnded {
                            pending: fragments.join(" "),
                        }));
                    }
                    break;
                }

                if line.starts_with(AMAZON_INVOICE_HEADER) {
                    index += 1;
                    continue;
                }

                match AMAZON_INVOICE_ROW.captures(line) {
                    Some(caps) => {
                        let name = squash_whitespace(&fragments.join(" "));
                        fragments.clear();
                        guard = ScanGuard::new(self.supplier(), "items", config.scan_limit);

                        let quantity = caps["qty"].parse::<u32>().ok();
                        let price = parse_amount(&caps["subtotal"]);
                        match (name.is_empty(), quantity, price) {
                            (false, Some(quantity), Some(price)) => {
                                trace!("Parsed item {:?} x{}", name, quantity);
                                items.insert(
                                    name,
                                    LineItem {
                                        quantity,
                                        price,
                                        unit_price: parse_amount(&caps["unit_inc"]),
                                        basis: PriceBasis::IncVat,
                                    },
                                );
                            }
                            _ => warn!("Skipping price row without description at line {}", index),
                        }
                    }
                    None => fragments.push(line),
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
                (SummaryField::Subtotal, &*AMAZON_INVOICE_SUBTOTAL),
                (SummaryField::Delivery, &*AMAZON_INVOICE_SHIPPING),
                (SummaryField::Promotion, &*AMAZON_INVOICE_PROMOTION),
                (SummaryField::Vat, &*AMAZON_INVOICE_VAT),
                (SummaryField::Total, &*AMAZON_INVOICE_TOTAL),
            ],
        )
    }

    fn metadata(&self, text: &str) -> OrderMetadata {
        OrderMetadata {
            order_number: first_capture(&AMAZON_ORDER_NUMBER, text).map(str::to_string),
            order_date: first_capture(&AMAZON_INVOICE_DATE, text).and_then(parse_long_date),
        }
    }
}
