//! Text, flag and timestamp normalization helpers shared by the stages.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Lowercase and trim a label for case-insensitive joins.
pub fn normalize_label<T: AsRef<str>>(text: T) -> String {
    text.as_ref().trim().to_lowercase()
}

/// Trim a cell and map blank values to `None`.
pub fn non_blank<T: AsRef<str>>(text: T) -> Option<String> {
    let trimmed = text.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a spreadsheet-style 0/1 flag.
///
/// Blank cells are `Ok(None)`; anything that is not a recognizable flag is
/// returned as `Err` with the trimmed input so callers can build a typed error.
pub fn parse_flag(raw: &str) -> Result<Option<bool>, String> {
    let value = raw.trim();
    match value.to_ascii_lowercase().as_str() {
        "" | "nan" => Ok(None),
        "1" | "1.0" | "true" | "yes" => Ok(Some(true)),
        "0" | "0.0" | "false" | "no" => Ok(Some(false)),
        _ => Err(value.to_string()),
    }
}

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse an activity-report creation time.
///
/// RFC 3339 values are converted to UTC and the offset dropped; bare dates
/// resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
