//! Expiry date (AI 17) parsing.

use chrono::{Datelike, Months, NaiveDate};

/// Century assumed for the two-digit `YY` year.
const CENTURY: i32 = 2000;

/// Parse a `YYMMDD` expiry into a calendar date.
///
/// Day `00` means the last day of the month. Returns `None` unless the
/// value is exactly six ASCII digits naming a real date in 20YY.
pub fn parse_expiry(value: &str) -> Option<NaiveDate> {
    if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = CENTURY + value[0..2].parse::<i32>().ok()?;
    let month: u32 = value[2..4].parse().ok()?;
    let day: u32 = value[4..6].parse().ok()?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    if day == 0 {
        return first.checked_add_months(Months::new(1))?.pred_opt();
    }
    first.with_day(day)
}

/// Normalize a `YYMMDD` expiry to `YYYYMMDD`.
pub fn normalize_expiry(value: &str) -> Option<String> {
    parse_expiry(value).map(|d| format!("{:04}{:02}{:02}", d.year(), d.month(), d.day()))
}
