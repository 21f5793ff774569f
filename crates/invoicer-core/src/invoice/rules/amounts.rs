//! Monetary amount parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a printed amount (e.g., "£1,234.56", "-£5.00", "12.99").
///
/// Currency symbols, thousands separators and whitespace are dropped. The
/// sign is ignored; callers that care about direction know it from context.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() || cleaned.matches('.').count() > 1 {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with thousands separators (1,234.56).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.99"), Some(Decimal::new(1299, 2)));
        assert_eq!(parse_amount("£1,234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("-£5.00"), Some(Decimal::new(500, 2)));
        assert_eq!(parse_amount(" € 0.25 "), Some(Decimal::new(25, 2)));
    }

    #[test]
    fn test_parse_amount_keeps_zero() {
        assert_eq!(parse_amount("0.00"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("£"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("free"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(123456, 2)), "1,234.56");
        assert_eq!(format_amount(Decimal::new(1234567890, 2)), "12,345,678.90");
        assert_eq!(format_amount(Decimal::new(-500, 2)), "-5.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }
}
