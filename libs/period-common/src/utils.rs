//! Utility functions for period formatting

use crate::constants::{DB_TIMESTAMP_FORMAT, DB_UTC_SUFFIX};
use chrono::{DateTime, SecondsFormat, Utc};

/// Format an instant as an RFC 3339 timestamp with millisecond precision and a `Z` suffix
#[must_use]
pub fn format_iso_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format an instant as a stored range boundary, e.g. `2014-03-01 13:00:00+00`
///
/// Sub-second precision is truncated; the stored grammar has none.
#[must_use]
pub fn format_db_timestamp(dt: &DateTime<Utc>) -> String {
    format!("{}{DB_UTC_SUFFIX}", dt.format(DB_TIMESTAMP_FORMAT))
}

/// Truncate a string to a maximum length, respecting char boundaries
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
