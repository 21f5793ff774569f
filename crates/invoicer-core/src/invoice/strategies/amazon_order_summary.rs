//! Amazon order summary printouts.
//!
//! Each shipment block opens with `Items Ordered Price`. An item starts with
//! `<qty> of: <name>`, its name may wrap over several lines mixed with seller
//! and condition notes, and it ends on the line carrying the price. Several
//! items can follow one header; other lines between them are skipped until
//! the next header or the `Item(s) Subtotal` line.

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::invoice::rules::{
    parse_amount, parse_long_date, AMAZON_ORDER_NUMBER, AMAZON_ORDER_PLACED,
    AMAZON_SUMMARY_BLOCK_END, AMAZON_SUMMARY_DELIVERY, AMAZON_SUMMARY_HEADER, AMAZON_SUMMARY_ITEM, AMAZON_SUMMARY_NOISE,
    AMAZON_SUMMARY_PRICE, AMAZON_SUMMARY_PROMOTION, AMAZON_SUMMARY_SUBTOTAL,
    AMAZON_SUMMARY_TOTAL, AMAZON_SUMMARY_VAT,
};
use crate::invoice::scan::{extract_summary, find_anchor, first_capture, squash_whitespace, ScanGuard};
use crate::invoice::{Result, SupplierStrategy};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{
    InvoiceSummary, Items, LineItem, OrderMetadata, PriceBasis, Supplier, SummaryField,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonOrderSummary;

/// Strip seller and condition notes from a name fragment.
fn clean_fragment(fragment: &str) -> String {
    squash_whitespace(&AMAZON_SUMMARY_NOISE.replace_all(fragment, ""))
}

impl AmazonOrderSummary {
    /// Consume one item starting at `start`. Returns the item and the index of its price line.
    fn consume_item(
        &self,
        lines: &[String],
        start: usize,
        quantity: u32,
        first_fragment: &str,
        config: &ExtractionConfig,
    ) -> Result<(String, Option<Decimal>, usize)> {
        let mut guard = ScanGuard::new(self.supplier(), "items", config.scan_limit);
        let mut fragments = Vec::new();
        let mut index = start;
        let mut current = first_fragment.to_string();

        loop {
            if let Some(caps) = AMAZON_SUMMARY_PRICE.captures(&current) {
                fragments.push(clean_fragment(&caps[1]));
                let price = parse_amount(&caps[2]);
                let name = squash_whitespace(&fragments.join(" "));
                trace!("Item {:?} x{} ends at line {}", name, quantity, index);
                return Ok((name, price, index));
            }

            fragments.push(clean_fragment(&current));
            index += 1;
            current = guard.consume(lines, index)?.to_string();
        }
    }
}

impl SupplierStrategy for AmazonOrderSummary {
    fn supplier(&self) -> Supplier {
        Supplier::AmazonOrderSummary
    }

    fn items_breakdown(&self, lines: &[String], config: &ExtractionConfig) -> Result<Items> {
        let mut items = Items::new();
        let mut from = 0;

        while let Some(anchor) = find_anchor(lines, from, |line| line == AMAZON_SUMMARY_HEADER) {
            debug!("Items header at line {}", anchor);
            let mut found = 0;
            let mut index = anchor + 1;

            // The block runs to the next header or the order totals
            while let Some(line) = lines.get(index).map(|line| line.trim()) {
                if line == AMAZON_SUMMARY_HEADER || line.starts_with(AMAZON_SUMMARY_BLOCK_END) {
                    break;
                }

                let Some(caps) = AMAZON_SUMMARY_ITEM.captures(line) else {
                    debug!("Skipping non-item line {:?}", line);
                    index += 1;
                    continue;
                };
                let Ok(quantity) = caps[1].parse::<u32>() else {
                    warn!("Unreadable quantity {:?} at line {}", &caps[1], index);
                    index += 1;
                    continue;
                };

                let (name, price, end) = self.consume_item(lines, index, quantity, &caps[2], config)?;
                index = end + 1;

                match price {
                    Some(price) if !name.is_empty() => {
                        found += 1;
                        items.insert(
                            name,
                            LineItem {
                                quantity,
                                price,
                                unit_price: None,
                                basis: PriceBasis::IncVat,
                            },
                        );
                    }
                    _ => warn!("Dropping item without name or price before line {}", index),
                }
            }

            if found == 0 {
                debug!("No item under header at line {}", anchor);
            }
            from = index;
        }

        debug!("Found {} items", items.len());
        Ok(items)
    }

    fn summary(&self, text: &str) -> InvoiceSummary {
        extract_summary(
            text,
            &[
                (SummaryField::Subtotal, &*AMAZON_SUMMARY_SUBTOTAL),
                (SummaryField::Delivery, &*AMAZON_SUMMARY_DELIVERY),
                (SummaryField::Promotion, &*AMAZON_SUMMARY_PROMOTION),
                (SummaryField::Vat, &*AMAZON_SUMMARY_VAT),
                (SummaryField::Total, &*AMAZON_SUMMARY_TOTAL),
            ],
        )
    }

    fn metadata(&self, text: &str) -> OrderMetadata {
        OrderMetadata {
            order_number: first_capture(&AMAZON_ORDER_NUMBER, text).map(str::to_string),
            order_date: first_capture(&AMAZON_ORDER_PLACED, text).and_then(parse_long_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::error::{ExtractionError, ScanFailure};

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn summary_lines() -> Vec<String> {
        lines(&[
            "Final Details for Order #202-1234567-7654321",
            "Order Placed: 3 March 2021",
            "Amazon.co.uk order number: 202-1234567-7654321",
            "Items Ordered Price",
            "1 of: Beeswax Pellets 1kg, Natural Yellow Sold by: Candle Supplies Ltd",
            "Condition: New",
            "£12.99",
            "2 of: Cotton Wicks",
            "Pre-Waxed 15cm Condition: New",
            "£7.50",
            "Shipping Address:",
            "Item(s) Subtotal: £20.49",
            "Postage & Packing: £0.00",
            "Promotion Applied: -£2.00",
            "Total Before VAT: £15.41",
            "VAT: £3.08",
            "Grand Total: £18.49",
        ])
    }

    #[test]
    fn test_items_breakdown() {
        let items = AmazonOrderSummary
            .items_breakdown(&summary_lines(), &ExtractionConfig::default())
            .unwrap();

        assert_eq!(
            items.keys().cloned().collect::<Vec<_>>(),
            vec!["Beeswax Pellets 1kg, Natural Yellow", "Cotton Wicks Pre-Waxed 15cm"]
        );

        let beeswax = &items["Beeswax Pellets 1kg, Natural Yellow"];
        assert_eq!(beeswax.quantity, 1);
        assert_eq!(beeswax.price, Decimal::new(1299, 2));
        assert_eq!(beeswax.basis, PriceBasis::IncVat);

        let wicks = &items["Cotton Wicks Pre-Waxed 15cm"];
        assert_eq!(wicks.quantity, 2);
        assert_eq!(wicks.price, Decimal::new(750, 2));
    }

    #[test]
    fn test_price_on_name_line() {
        let raw = lines(&["Items Ordered Price", "1of:Soy Wax Flakes £9.99"]);
        let items = AmazonOrderSummary
            .items_breakdown(&raw, &ExtractionConfig::default())
            .unwrap();
        assert_eq!(items["Soy Wax Flakes"].price, Decimal::new(999, 2));
    }

    #[test]
    fn test_header_without_item_line_is_skipped() {
        let raw = lines(&[
            "Items Ordered Price",
            "Delivery estimate",
            "Items Ordered Price",
            "3 of: Jar",
            "£1.00",
        ]);
        let items = AmazonOrderSummary
            .items_breakdown(&raw, &ExtractionConfig::default())
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items["Jar"].quantity, 3);
    }

    #[test]
    fn test_noise_between_items_is_skipped() {
        let raw = lines(&[
            "Items Ordered Price",
            "Delivered 4 March",
            "1 of: Jar",
            "£1.00",
            "Gift options: none",
            "2 of: Lid",
            "£0.50",
            "Item(s) Subtotal: £2.00",
            "1 of: Not an item",
        ]);
        let items = AmazonOrderSummary
            .items_breakdown(&raw, &ExtractionConfig::default())
            .unwrap();
        assert_eq!(items.keys().cloned().collect::<Vec<_>>(), vec!["Jar", "Lid"]);
        assert_eq!(items["Lid"].quantity, 2);
    }

    #[test]
    fn test_padded_lines_match() {
        let raw = lines(&["Items Ordered Price  ", "  1 of: Jar", "£1.00 "]);
        let items = AmazonOrderSummary
            .items_breakdown(&raw, &ExtractionConfig::default())
            .unwrap();
        assert_eq!(items["Jar"].price, Decimal::new(100, 2));
    }

    #[test]
    fn test_unterminated_name_trips_guard() {
        let mut raw = lines(&["Items Ordered Price", "1 of: Endless"]);
        raw.extend((0..20).map(|i| format!("fragment {i}")));

        let err = AmazonOrderSummary
            .items_breakdown(&raw, &ExtractionConfig::with_scan_limit(10))
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Unrecoverable {
                reason: ScanFailure::LimitExceeded { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_summary() {
        let summary = AmazonOrderSummary.summary(&summary_lines().join("\n"));
        assert_eq!(summary.subtotal, Some(Decimal::new(2049, 2)));
        assert_eq!(summary.delivery, Some(Decimal::ZERO));
        assert_eq!(summary.promotion, Some(Decimal::new(200, 2)));
        assert_eq!(summary.vat, Some(Decimal::new(308, 2)));
        assert_eq!(summary.total, Some(Decimal::new(1849, 2)));
    }

    #[test]
    fn test_metadata() {
        let metadata = AmazonOrderSummary.metadata(&summary_lines().join("\n"));
        assert_eq!(metadata.order_number.as_deref(), Some("202-1234567-7654321"));
        assert_eq!(metadata.order_date, NaiveDate::from_ymd_opt(2021, 3, 3));
    }

    #[test]
    fn test_metadata_missing_date() {
        let metadata = AmazonOrderSummary.metadata("Items Ordered Price");
        assert_eq!(metadata, OrderMetadata::default());
    }
}
