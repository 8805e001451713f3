//! Display formatting helpers.

use chrono::{DateTime, Utc};

/// Format `value` as US currency with thousands separators, e.g. `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (whole, cents) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let negative = value < 0.0 && rendered.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

/// Wall-clock time of a feed entry, `HH:MM:SS`.
pub fn format_time(now: DateTime<Utc>) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Header clock, `HH:MM:SS UTC`.
pub fn format_clock(now: DateTime<Utc>) -> String {
    format!("{} UTC", format_time(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(100_000.0), "$100,000.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_clock() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(format_time(now), "09:05:07");
        assert_eq!(format_clock(now), "09:05:07 UTC");
    }
}
