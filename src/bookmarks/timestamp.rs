//! Browser bookmark timestamps: microseconds since 1601-01-01 UTC.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

/// Milliseconds between 1601-01-01 and the Unix epoch (negative).
pub const EPOCH_OFFSET_MS: i64 = -11_644_473_600_000;

/// Default display pattern: numeric day, month and year.
pub const DEFAULT_DATE_FORMAT: &str = "%-d.%-m.%Y";

/// Decode a raw `date_added` value.
///
/// Leading whitespace and any non-digit tail are ignored, so `"123abc"`
/// reads as `123`. Returns `None` when no digits lead the string or the
/// value does not fit a representable date.
pub fn decode_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let micros: i64 = digits[..end].parse().ok()?;
    let micros = if negative { -micros } else { micros };
    let millis = EPOCH_OFFSET_MS.checked_add(micros.div_euclid(1000))?;
    DateTime::from_timestamp_millis(millis)
}

/// How dates are shown: a strftime pattern and the zone to show them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStyle {
    pattern: String,
    local_time: bool,
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
            local_time: true,
        }
    }
}

impl DateStyle {
    /// Build a style, falling back to the default pattern if `pattern`
    /// contains invalid strftime items.
    pub fn new(pattern: &str, local_time: bool) -> Self {
        let pattern = if is_valid_pattern(pattern) {
            pattern.to_string()
        } else {
            tracing::warn!(pattern, "invalid date format, using {}", DEFAULT_DATE_FORMAT);
            DEFAULT_DATE_FORMAT.to_string()
        };
        Self {
            pattern,
            local_time,
        }
    }

    /// Dates rendered in UTC with the given pattern.
    #[cfg(test)]
    pub fn utc(pattern: &str) -> Self {
        Self::new(pattern, false)
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Format a decoded date for display.
pub fn format_date(date: &DateTime<Utc>, style: &DateStyle) -> String {
    if style.local_time {
        date.with_timezone(&Local).format(&style.pattern).to_string()
    } else {
        date.format(&style.pattern).to_string()
    }
}

/// Decode and format in one step; `None` for missing or unreadable values.
pub fn display_date(raw: Option<&str>, style: &DateStyle) -> Option<String> {
    raw.and_then(decode_timestamp)
        .map(|date| format_date(&date, style))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_offset_epoch() {
        let date = decode_timestamp("13270256129000000").unwrap();
        assert_eq!(date.timestamp_millis(), 1_625_782_529_000);
        assert_eq!(date.to_rfc3339(), "2021-07-08T22:15:29+00:00");
    }

    #[test]
    fn zero_is_the_offset_epoch() {
        let date = decode_timestamp("0").unwrap();
        assert_eq!(date.timestamp_millis(), EPOCH_OFFSET_MS);
        assert_eq!(date.format("%Y-%m-%d").to_string(), "1601-01-01");
    }

    #[test]
    fn sub_millisecond_part_is_floored() {
        let date = decode_timestamp("13270256129000999").unwrap();
        assert_eq!(date.timestamp_millis(), 1_625_782_529_000);
    }

    #[test]
    fn non_numeric_does_not_panic() {
        assert!(decode_timestamp("").is_none());
        assert!(decode_timestamp("abc").is_none());
        assert!(decode_timestamp("-").is_none());
        assert!(decode_timestamp("99999999999999999999999").is_none());
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        let date = decode_timestamp("  13270256129000000xyz").unwrap();
        assert_eq!(date.timestamp_millis(), 1_625_782_529_000);
    }

    #[test]
    fn formats_numeric_day_month_year() {
        let date = decode_timestamp("13270256129000000").unwrap();
        assert_eq!(format_date(&date, &DateStyle::utc(DEFAULT_DATE_FORMAT)), "8.7.2021");
        assert_eq!(format_date(&date, &DateStyle::utc("%Y-%m-%d")), "2021-07-08");
    }

    #[test]
    fn invalid_pattern_falls_back() {
        let style = DateStyle::new("%Q%", false);
        assert_eq!(style, DateStyle::utc(DEFAULT_DATE_FORMAT));
    }

    #[test]
    fn display_date_absent_is_none() {
        let style = DateStyle::utc(DEFAULT_DATE_FORMAT);
        assert_eq!(display_date(None, &style), None);
        assert_eq!(display_date(Some("n/a"), &style), None);
        assert_eq!(
            display_date(Some("13270256129000000"), &style).as_deref(),
            Some("8.7.2021")
        );
    }
}
