//! Converts raw cell text into typed values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ParseError, ParseResult};

const SITE_DATE_FORMAT: &str = "%m/%d/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a site date (`MM/DD/YYYY`).
pub fn parse_site_date(field: &'static str, raw: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), SITE_DATE_FORMAT).map_err(|_| ParseError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Format a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse a bail cell such as `$1,500.00`.
///
/// A leading currency symbol is dropped and `,` grouping separators are
/// removed. Anything that is still not a number (`No Bond`, blank) is `None`.
pub fn parse_bail_amount(raw: &str) -> Option<Decimal> {
    let text = raw.trim();
    let text = text.strip_prefix('$').unwrap_or(text).trim_start();
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&digits).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::prelude::FromPrimitive;

    fn normalize_date(field: &'static str, raw: &str) -> ParseResult<String> {
        parse_site_date(field, raw).map(iso_date)
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("dob", "01/02/1980").unwrap(), "1980-01-02");
        assert_eq!(normalize_date("issue", " 06/15/2020 ").unwrap(), "2020-06-15");
    }

    #[test]
    fn test_invalid_date() {
        let err = normalize_date("dob", "1980-01-02").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidDate {
                field: "dob",
                value: "1980-01-02".into()
            }
        );
        assert!(normalize_date("dob", "13/40/1980").is_err());
        assert!(normalize_date("dob", "").is_err());
    }

    #[test]
    fn test_bail_with_currency_and_grouping() {
        assert_eq!(parse_bail_amount("$1,500.00"), Decimal::from_str("1500.00").ok());
        assert_eq!(parse_bail_amount("$2,000.00"), Decimal::from_f64(2000.0));
        assert_eq!(parse_bail_amount(" $250 "), Some(Decimal::from(250)));
        assert_eq!(parse_bail_amount("$1,000,000.50"), Decimal::from_str("1000000.50").ok());
    }

    #[test]
    fn test_bail_no_bond() {
        assert_eq!(parse_bail_amount("No Bond"), None);
        assert_eq!(parse_bail_amount("NO BOND"), None);
        assert_eq!(parse_bail_amount(""), None);
        assert_eq!(parse_bail_amount("$"), None);
    }

    proptest! {
        #[test]
        fn prop_date_round_trip(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=28) {
            let raw = format!("{:02}/{:02}/{:04}", month, day, year);
            let iso = normalize_date("issue", &raw).unwrap();

            let parts: Vec<&str> = iso.split('-').collect();
            prop_assert_eq!(parts.len(), 3);
            let back = format!("{}/{}/{}", parts[1], parts[2], parts[0]);
            prop_assert_eq!(back, raw);
        }
    }
}
