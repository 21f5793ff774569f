//! Regex patterns for the supported supplier layouts.

use lazy_static::lazy_static;
use regex::Regex;

/// Header row opening the Soak Rochford item table.
pub const SOAK_ROCHFORD_HEADER: &str = "SKU Product Quantity Price Total Price";

/// Header row opening the Amazon order summary item list.
pub const AMAZON_SUMMARY_HEADER: &str = "Items Ordered Price";

/// Prefix of the line closing an Amazon order summary item block.
pub const AMAZON_SUMMARY_BLOCK_END: &str = "Item(s) Subtotal";

/// Prefix of the header row opening the Amazon VAT invoice item table.
pub const AMAZON_INVOICE_HEADER: &str = "Description Qty";

/// Lines closing the Amazon VAT invoice item table.
pub const AMAZON_INVOICE_TABLE_END: [&str; 3] =
    ["Shipping charges", "Subtotal (excl. VAT)", "Invoice total"];

lazy_static! {
    // Amazon order summary: "1 of: Product name Sold by: Seller"
    pub static ref AMAZON_SUMMARY_ITEM: Regex = Regex::new(
        r"^(\d+)\s*of:\s*(.*)$"
    ).unwrap();

    // A line ending in a two-decimal price; the prefix is the tail of the name
    pub static ref AMAZON_SUMMARY_PRICE: Regex = Regex::new(
        r"^(.*?)\s*[£$€]?\s*(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2})$"
    ).unwrap();

    pub static ref AMAZON_SUMMARY_NOISE: Regex = Regex::new(
        r"\s*Sold by:.*|\s*Condition:\s*New"
    ).unwrap();

    pub static ref AMAZON_SUMMARY_SUBTOTAL: Regex = Regex::new(
        r"Item\(s\) Subtotal:\s*[£$€]?\s*(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_SUMMARY_DELIVERY: Regex = Regex::new(
        r"Postage & Packing:\s*[£$€]?\s*(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_SUMMARY_PROMOTION: Regex = Regex::new(
        r"Promotions? Applied:\s*-?\s*[£$€]?\s*(\d[\d,]*\.\d{2})"
    ).unwrap();

    // Line-anchored so "Total Before VAT:" does not match
    pub static ref AMAZON_SUMMARY_VAT: Regex = Regex::new(
        r"(?m)^(?:Estimated )?VAT:\s*[£$€]?\s*(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_SUMMARY_TOTAL: Regex = Regex::new(
        r"Grand Total:\s*[£$€]?\s*(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_ORDER_NUMBER: Regex = Regex::new(
        r"(?i)(?:order number|order #|order no\.?):?\s*(\d{3}-\d{7}-\d{7})"
    ).unwrap();

    pub static ref AMAZON_ORDER_PLACED: Regex = Regex::new(
        r"Order Placed:\s*(\d{1,2}\s+[A-Za-z]+\.?\s+\d{4})"
    ).unwrap();

    // Soak Rochford row: "07-05- 01 Pourer Spout Tops 10 £0.25 £2.50"
    // A SKU ending in '-' was split by extraction; its digit runs still belong to it
    pub static ref SOAK_ROCHFORD_ROW: Regex = Regex::new(
        r"^(?P<sku>[A-Za-z0-9][A-Za-z0-9-]*-(?:\s+\d+-)*(?:\s+\d+)?|[A-Za-z0-9][A-Za-z0-9-]*)\s+(?P<name>.+?)\s+(?P<qty>\d+)\s+£?(?P<unit>\d[\d,]*\.\d{2})\s+£?(?P<total>\d[\d,]*\.\d{2})$"
    ).unwrap();

    // "North Star Silver Mica Powder - 25g Weight : 25g"
    pub static ref SOAK_ROCHFORD_WEIGHT: Regex = Regex::new(
        r"\s*Weight\s*:\s*\d+\s*g\b"
    ).unwrap();

    pub static ref SOAK_ROCHFORD_SUBTOTAL: Regex = Regex::new(
        r"Subtotal £(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref SOAK_ROCHFORD_SHIPPING: Regex = Regex::new(
        r"Shipping £(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref SOAK_ROCHFORD_DISCOUNT: Regex = Regex::new(
        r"Cart Discount -?£(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref SOAK_ROCHFORD_VAT: Regex = Regex::new(
        r"VAT £(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref SOAK_ROCHFORD_TOTAL: Regex = Regex::new(
        r"(?m)(?:^|\s)Total £(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref SOAK_ROCHFORD_ORDER_NUMBER: Regex = Regex::new(
        r"(?m)Order No:[ \t]*(\S.*?)[ \t]*$"
    ).unwrap();

    pub static ref SOAK_ROCHFORD_DATE: Regex = Regex::new(
        r"(?m)Date:[ \t]*(\d{2}/\d{2}/\d{4})[ \t]*$"
    ).unwrap();

    // Amazon VAT invoice row: "1 £8.33 20% £9.99 £9.99"
    pub static ref AMAZON_INVOICE_ROW: Regex = Regex::new(
        r"^(?P<qty>\d+)\s+£?(?P<unit_ex>\d[\d,]*\.\d{2})\s+(?P<rate>\d{1,2}(?:\.\d+)?)%\s+£?(?P<unit_inc>\d[\d,]*\.\d{2})\s+£?(?P<subtotal>\d[\d,]*\.\d{2})$"
    ).unwrap();

    pub static ref AMAZON_INVOICE_SUBTOTAL: Regex = Regex::new(
        r"Subtotal \(excl\. VAT\):?\s*£?(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_INVOICE_SHIPPING: Regex = Regex::new(
        r"Shipping charges:?\s*£?(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_INVOICE_PROMOTION: Regex = Regex::new(
        r"Promotions?:?\s*-?\s*£?(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_INVOICE_VAT: Regex = Regex::new(
        r"Total VAT:?\s*£?(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_INVOICE_TOTAL: Regex = Regex::new(
        r"Invoice total:?\s*£?(\d[\d,]*\.\d{2})"
    ).unwrap();

    pub static ref AMAZON_INVOICE_DATE: Regex = Regex::new(
        r"Invoice date(?: / Delivery date)?:?\s*(\d{1,2}\s+[A-Za-z]+\.?\s+\d{4})"
    ).unwrap();

    // Long-form dates: "3 March 2021", "03 Mar. 2021"
    pub static ref DATE_LONG: Regex = Regex::new(
        r"^(\d{1,2})\s+([A-Za-z]+)\.?\s+(\d{4})$"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{4})$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soak_rochford_row_groups() {
        let caps = SOAK_ROCHFORD_ROW
            .captures("07-05- 01 Pourer Spout Tops with Dust Caps 10 £0.25 £2.50")
            .unwrap();
        assert_eq!(&caps["sku"], "07-05- 01");
        assert_eq!(&caps["name"], "Pourer Spout Tops with Dust Caps");
        assert_eq!(&caps["qty"], "10");
        assert_eq!(&caps["unit"], "0.25");
        assert_eq!(&caps["total"], "2.50");
    }

    #[test]
    fn test_soak_rochford_row_sku_forms() {
        let sku_and_name = |row: &str| {
            let caps = SOAK_ROCHFORD_ROW.captures(row).unwrap();
            (caps["sku"].to_string(), caps["name"].to_string())
        };

        assert_eq!(
            sku_and_name("07- 05- 01 Pourer Spout 10 £0.25 £2.50"),
            ("07- 05- 01".to_string(), "Pourer Spout".to_string())
        );
        assert_eq!(
            sku_and_name("NS-25 North Star Mica 2 £1.50 £3.00"),
            ("NS-25".to_string(), "North Star Mica".to_string())
        );
        // A leading measure is part of the name, not the SKU
        assert_eq!(
            sku_and_name("JAR- 100ml Amber Jar 6 £1.10 £6.60"),
            ("JAR-".to_string(), "100ml Amber Jar".to_string())
        );
    }

    #[test]
    fn test_soak_rochford_total_skips_subtotal() {
        let text = "Subtotal £10.00\nTotal £12.00";
        let caps = SOAK_ROCHFORD_TOTAL.captures(text).unwrap();
        assert_eq!(&caps[1], "12.00");
    }

    #[test]
    fn test_amazon_vat_skips_total_before_vat() {
        let text = "Total Before VAT: £8.33\nVAT: £1.67";
        let caps = AMAZON_SUMMARY_VAT.captures(text).unwrap();
        assert_eq!(&caps[1], "1.67");
    }

    #[test]
    fn test_amazon_price_line() {
        let caps = AMAZON_SUMMARY_PRICE.captures("£12.99").unwrap();
        assert_eq!(&caps[1], "");
        assert_eq!(&caps[2], "12.99");

        let caps = AMAZON_SUMMARY_PRICE.captures("Pack of 2 £1,012.99").unwrap();
        assert_eq!(&caps[1], "Pack of 2");
        assert_eq!(&caps[2], "1,012.99");

        assert!(AMAZON_SUMMARY_PRICE.captures("Condition: New").is_none());
    }

    #[test]
    fn test_amazon_invoice_row() {
        let caps = AMAZON_INVOICE_ROW
            .captures("2 £8.33 20% £10.00 £20.00")
            .unwrap();
        assert_eq!(&caps["qty"], "2");
        assert_eq!(&caps["unit_inc"], "10.00");
        assert_eq!(&caps["subtotal"], "20.00");
    }
}
