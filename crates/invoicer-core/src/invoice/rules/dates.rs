//! Date parsing for order metadata.
//!
//! Both parsers return `None` on anything they cannot read; an absent or
//! informal date is never an error.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_LONG};

/// Parse a day-first numeric date ("25/12/2021").
pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    let caps = DATE_DMY.captures(s.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a long-form date ("3 March 2021", "03 Mar. 2021").
pub fn parse_long_date(s: &str) -> Option<NaiveDate> {
    let caps = DATE_LONG.captures(s.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_to_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_to_number(month: &str) -> Option<u32> {
    let month = month.to_lowercase();
    let number = match month.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dmy() {
        assert_eq!(parse_dmy("25/12/2021"), NaiveDate::from_ymd_opt(2021, 12, 25));
        assert_eq!(parse_dmy(" 01/02/2020 "), NaiveDate::from_ymd_opt(2020, 2, 1));
    }

    #[test]
    fn test_parse_dmy_invalid_falls_back() {
        assert_eq!(parse_dmy("31/02/2021"), None);
        assert_eq!(parse_dmy("2021-02-01"), None);
        assert_eq!(parse_dmy("soon"), None);
    }

    #[test]
    fn test_parse_long_date() {
        assert_eq!(parse_long_date("3 March 2021"), NaiveDate::from_ymd_opt(2021, 3, 3));
        assert_eq!(parse_long_date("03 Mar. 2021"), NaiveDate::from_ymd_opt(2021, 3, 3));
        assert_eq!(parse_long_date("12 SEPT 2019"), NaiveDate::from_ymd_opt(2019, 9, 12));
    }

    #[test]
    fn test_parse_long_date_invalid_falls_back() {
        assert_eq!(parse_long_date("3 Brumaire 2021"), None);
        assert_eq!(parse_long_date("30 February 2021"), None);
    }
}
