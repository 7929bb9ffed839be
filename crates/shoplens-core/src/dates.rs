//! Lenient date parsing for schema dates, visible page dates and HTTP headers

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%m/%d/%y",
];

/// Parse a date in any of the formats commonly found on product pages.
///
/// Returns `None` rather than guessing when the input is ambiguous garbage.
pub fn parse_loose_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    // "May. 3, 2024" / "Sept 3, 2024"
    let cleaned = trimmed.replace('.', "").replace("Sept ", "Sep ");
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return Some(date);
        }
    }

    // ISO datetime with an offset chrono refuses, e.g. "2024-05-01T10:00:00+0000"
    if trimmed.len() >= 10 && trimmed.is_char_boundary(10) {
        return NaiveDate::parse_from_str(&trimmed[..10], "%Y-%m-%d").ok();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_variants() {
        assert_eq!(parse_loose_date("2024-05-01"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_loose_date("2024-05-01T10:00:00Z"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_loose_date("2024-05-01T10:00:00+0000"), Some(ymd(2024, 5, 1)));
    }

    #[test]
    fn test_parse_http_date() {
        assert_eq!(
            parse_loose_date("Wed, 21 Oct 2015 07:28:00 GMT"),
            Some(ymd(2015, 10, 21))
        );
    }

    #[test]
    fn test_parse_human_dates() {
        assert_eq!(parse_loose_date("March 3, 2024"), Some(ymd(2024, 3, 3)));
        assert_eq!(parse_loose_date("Mar. 3, 2024"), Some(ymd(2024, 3, 3)));
        assert_eq!(parse_loose_date("3 March 2024"), Some(ymd(2024, 3, 3)));
        assert_eq!(parse_loose_date("03/15/2024"), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_loose_date(""), None);
        assert_eq!(parse_loose_date("soon"), None);
    }
}
