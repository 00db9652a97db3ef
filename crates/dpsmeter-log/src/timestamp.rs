//! Combat log timestamp grammar

use chrono::NaiveDateTime;

/// `yyyyMMdd-HH:mm:ss:fff`
pub const FULL_FORMAT: &str = "%Y%m%d-%H:%M:%S:%3f";

/// `yyyyMMdd-HH:mm:ss`
pub const SHORT_FORMAT: &str = "%Y%m%d-%H:%M:%S";

/// Parse a log timestamp, with milliseconds first, then without
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    [FULL_FORMAT, SHORT_FORMAT]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
