// Utility helpers for parsing and display formatting.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed; such values
///   count as missing and are excluded from every aggregate.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // CSV dates are expected in `YYYY-MM-DD` format.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

/// Compact magnitude label for large counts (`1.2K`, `3.4M`, `5.6B`),
/// matching the axis labels of the regional chart.
pub fn human_format(x: f64) -> String {
    if x >= 1_000_000_000.0 {
        format!("{:.1}B", x / 1_000_000_000.0)
    } else if x >= 1_000_000.0 {
        format!("{:.1}M", x / 1_000_000.0)
    } else if x >= 1_000.0 {
        format!("{:.1}K", x / 1_000.0)
    } else {
        format!("{}", x as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_separated_numbers() {
        assert_eq!(parse_f64_safe(Some("1500")), Some(1500.0));
        assert_eq!(parse_f64_safe(Some("1,500.25")), Some(1500.25));
        assert_eq!(parse_f64_safe(Some("  42 ")), Some(42.0));
    }

    #[test]
    fn rejects_blank_and_textual_values() {
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("   ")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("12 beds")), None);
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date_safe(Some("2021-01-08")),
            NaiveDate::from_ymd_opt(2021, 1, 8)
        );
        assert_eq!(parse_date_safe(Some("08/01/2021")), None);
        assert_eq!(parse_date_safe(Some("not a date")), None);
        assert_eq!(parse_date_safe(None), None);
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(-1500.5, 1), "-1,500.5");
        assert_eq!(format_int(9855i64), "9,855");
    }

    #[test]
    fn human_format_picks_magnitude_suffix() {
        assert_eq!(human_format(950.0), "950");
        assert_eq!(human_format(1_200.0), "1.2K");
        assert_eq!(human_format(3_400_000.0), "3.4M");
        assert_eq!(human_format(5_600_000_000.0), "5.6B");
    }
}
