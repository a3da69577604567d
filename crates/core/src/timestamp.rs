//! Timestamp decoding across the two encodings the replica sees.
//!
//! Sheet cells come back either as a spreadsheet serial (days since
//! 1899-12-30, possibly fractional) or as a date string; the admin API
//! sends ISO-ish wall-clock strings with no offset. Everything is
//! normalized to UTC: a naive wall clock is taken as UTC directly, which
//! keeps decoding deterministic regardless of the host timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Epoch of spreadsheet date serials: serial 1 is 1899-12-31T00:00:00Z.
fn sheet_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1899, 12, 30, 0, 0, 0).unwrap()
}

/// Convert a date serial to UTC, to millisecond precision.
pub fn serial_to_utc(serial: f64) -> Option<DateTime<Utc>> {
    let millis = (serial * MS_PER_DAY).round() as i64;
    Utc.timestamp_millis_opt(sheet_epoch().timestamp_millis() + millis)
        .single()
}

/// Decode a timestamp value in any encoding the replica produces.
///
/// Accepts numeric serials (`"45231.5"`), RFC 3339 strings, and naive
/// `YYYY-MM-DD[ T]HH:MM:SS` / `YYYY-MM-DD` strings. Returns `None` for
/// empty or unparseable input. Idempotent under [`normalize`]: decoding
/// a normalized string yields the same instant.
pub fn decode(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(serial) = value.parse::<f64>() {
        return serial_to_utc(serial);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }

    None
}

/// Decode a raw sheet cell (number or string).
pub fn decode_cell(cell: &serde_json::Value) -> Option<DateTime<Utc>> {
    match cell {
        serde_json::Value::Number(n) => serial_to_utc(n.as_f64()?),
        serde_json::Value::String(s) => decode(s),
        _ => None,
    }
}

/// Canonical cell form of a decoded timestamp.
pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Re-encode any timestamp value into the canonical cell form.
///
/// Empty and unparseable input both map to the empty string, so a
/// malformed upstream value blanks the cell rather than poisoning the
/// column with mixed encodings.
pub fn normalize(value: &str) -> String {
    match decode(value) {
        Some(dt) => format_utc(dt),
        None => String::new(),
    }
}
