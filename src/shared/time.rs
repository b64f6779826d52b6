use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Number;

/// Utility for parsing and normalizing time inputs to epoch seconds (i64).
pub struct TimeParser;

impl TimeParser {
    /// Parse a string representing a time instant into epoch seconds (UTC).
    /// Supports RFC3339/ISO-8601 with offset, date-only (YYYY-MM-DD, taken as
    /// midnight UTC) and numeric strings.
    pub fn parse_str_to_epoch_seconds(input: &str) -> Option<i64> {
        Self::parse_str_to_instant(input).map(|(secs, _)| secs)
    }

    /// Like `parse_str_to_epoch_seconds`, also returning the offset the
    /// string was written with (seconds east of UTC, 0 when it has none).
    pub fn parse_str_to_instant(input: &str) -> Option<(i64, i32)> {
        let s = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some((dt.timestamp(), dt.offset().local_minus_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let dt = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
            return Some((dt.timestamp(), 0));
        }
        if let Ok(num) = s.parse::<i128>() {
            return Self::normalize_integer_epoch(num).map(|secs| (secs, 0));
        }
        None
    }

    /// Parse a JSON number as an epoch instant. Floats are seconds.
    pub fn number_to_epoch_seconds(n: &Number) -> Option<i64> {
        if let Some(i) = n.as_i64() {
            Self::normalize_integer_epoch(i as i128)
        } else if let Some(u) = n.as_u64() {
            Self::normalize_integer_epoch(u as i128)
        } else {
            let f = n.as_f64()?;
            if f.is_finite() {
                Some(f.floor() as i64)
            } else {
                None
            }
        }
    }

    /// Heuristic normalization of integer magnitudes to seconds.
    /// - up to 11 digits: seconds
    /// - 12..=14: milliseconds
    /// - 15..=16: microseconds
    /// - 17..=19: nanoseconds
    fn normalize_integer_epoch(n: i128) -> Option<i64> {
        let digits = num_digits_u128(n.unsigned_abs());
        let secs = match digits {
            0..=11 => n,
            12..=14 => n.div_euclid(1_000),
            15..=16 => n.div_euclid(1_000_000),
            17..=19 => n.div_euclid(1_000_000_000),
            _ => return None,
        };
        i64::try_from(secs).ok()
    }
}

fn num_digits_u128(mut x: u128) -> u32 {
    if x == 0 {
        return 1;
    }
    let mut c = 0;
    while x > 0 {
        x /= 10;
        c += 1;
    }
    c
}
