// Utility helpers for parsing and formatting.
//
// Timestamp handling and filename derivation live here so the dataset,
// chart and export code can work with clean values.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Formats accepted for naive timestamps. `%.f` also matches a missing
/// fractional part, so `2024-01-02T10:00:00` and `2024-01-02T10:00:00.000`
/// both parse.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp as served by the open-data API.
///
/// - Trims whitespace and rejects empty strings.
/// - Tries the naive ISO forms first, then RFC 3339 with an offset
///   (kept in its local wall-clock time), then a bare `YYYY-MM-DD`.
/// - Returns `None` for anything else.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Lower-case a title and replace spaces with underscores.
pub fn slugify(title: &str) -> String {
    title.trim().to_lowercase().replace(' ', "_")
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `1,000 records fetched`).
    n.to_formatted_string(&Locale::en)
}
