//! Conversion between ISO-8601 intervals and database range literals
//!
//! Observation times travel over the API as ISO-8601 intervals
//! (`2014-03-01T13:00:00.000Z/2015-05-11T15:30:00.000Z`) and are persisted as
//! timestamp range literals (`["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]`).
//! Both grammars denote the same pair of UTC instants; this module re-serializes
//! one into the other.
//!
//! Encoding drops sub-second precision because the stored grammar has none.
//! Decoding always renders milliseconds, `.000` when the store had no fraction.
//! Consequently `DB -> ISO -> DB` is exact, while `ISO -> DB -> ISO` is exact
//! only for inputs already at whole-second precision.

use crate::error::FormatError;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Utc};
use period_common::{
    format_db_timestamp, format_iso_timestamp, truncate_string, DB_BODY_MIN_LEN,
    DB_BOUNDARY_SEPARATOR, DB_PARSE_FORMAT, DB_QUOTE, DB_RANGE_CLOSE, DB_RANGE_OPEN,
    ISO_INTERVAL_SEPARATOR, MAX_ERROR_INPUT_LEN, MAX_YEAR, MIN_YEAR,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// An ordered pair of UTC instants
///
/// `start <= end` is not enforced; callers that need it validate separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval from two instants
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse a database range literal such as `["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]`
    ///
    /// Boundary offsets may be `±HH`, `±HHMM` or `±HH:MM`; they are applied to the
    /// wall-clock time to obtain the UTC instant.
    ///
    /// # Errors
    /// Returns `FormatError` if the brackets or quotes are malformed, the literal
    /// does not hold exactly two boundaries, or a boundary is not a valid timestamp
    pub fn from_db_period(db_period: &str) -> Result<Self, FormatError> {
        let inner = db_period
            .strip_prefix(DB_RANGE_OPEN)
            .ok_or_else(|| {
                FormatError::structure(db_period, format!("missing opening '{DB_RANGE_OPEN}'"))
            })?
            .strip_suffix(DB_RANGE_CLOSE)
            .ok_or_else(|| {
                FormatError::structure(db_period, format!("missing closing '{DB_RANGE_CLOSE}'"))
            })?;

        let (start, end) = split_pair(db_period, inner, DB_BOUNDARY_SEPARATOR)?;

        Ok(Self {
            start: parse_db_boundary(db_period, unquote(db_period, start)?)?,
            end: parse_db_boundary(db_period, unquote(db_period, end)?)?,
        })
    }

    /// Parse an ISO-8601 interval made of two RFC 3339 timestamps separated by `/`
    ///
    /// # Errors
    /// Returns `FormatError` if there is not exactly one `/` or either side is not
    /// a valid RFC 3339 timestamp
    pub fn from_iso8601(iso_period: &str) -> Result<Self, FormatError> {
        let (start, end) = split_pair(iso_period, iso_period, ISO_INTERVAL_SEPARATOR)?;

        Ok(Self {
            start: parse_iso_boundary(iso_period, start)?,
            end: parse_iso_boundary(iso_period, end)?,
        })
    }

    /// Render as a database range literal with `+00` offsets and whole seconds
    #[must_use]
    pub fn to_db_period(&self) -> String {
        format!(
            "{DB_RANGE_OPEN}{DB_QUOTE}{}{DB_QUOTE}{DB_BOUNDARY_SEPARATOR}{DB_QUOTE}{}{DB_QUOTE}{DB_RANGE_CLOSE}",
            format_db_timestamp(&self.start),
            format_db_timestamp(&self.end),
        )
    }

    /// Render as an ISO-8601 interval with millisecond precision and `Z` offsets
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        format!(
            "{}{ISO_INTERVAL_SEPARATOR}{}",
            format_iso_timestamp(&self.start),
            format_iso_timestamp(&self.end),
        )
    }
}

/// Convert a database range literal into an ISO-8601 interval
///
/// ```
/// use period_core::to_iso8601;
///
/// let iso = to_iso8601(r#"["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]"#).unwrap();
/// assert_eq!(iso, "2014-03-01T13:00:00.000Z/2015-05-11T15:30:00.000Z");
/// ```
///
/// # Errors
/// Returns `FormatError` for any malformed input; see [`Interval::from_db_period`]
pub fn to_iso8601(db_period: &str) -> Result<String, FormatError> {
    let iso = parse_db_period(db_period)?.to_iso8601();
    trace!(from = db_period, to = %iso, "decoded db period");
    Ok(iso)
}

/// Convert an ISO-8601 interval into a database range literal
///
/// ```
/// use period_core::to_db_period;
///
/// let db = to_db_period("2014-03-01T13:00:00Z/2015-05-11T15:30:00Z").unwrap();
/// assert_eq!(db, r#"["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]"#);
/// ```
///
/// # Errors
/// Returns `FormatError` for any malformed input; see [`Interval::from_iso8601`]
pub fn to_db_period(iso_period: &str) -> Result<String, FormatError> {
    let db = parse_iso_period(iso_period)?.to_db_period();
    trace!(from = iso_period, to = %db, "encoded iso8601 period");
    Ok(db)
}

/// Parse a database range literal, logging the rejection if it is malformed
///
/// # Errors
/// See [`Interval::from_db_period`]
pub fn parse_db_period(db_period: &str) -> Result<Interval, FormatError> {
    Interval::from_db_period(db_period).map_err(|e| log_rejection("db", e))
}

/// Parse an ISO-8601 interval, logging the rejection if it is malformed
///
/// # Errors
/// See [`Interval::from_iso8601`]
pub fn parse_iso_period(iso_period: &str) -> Result<Interval, FormatError> {
    Interval::from_iso8601(iso_period).map_err(|e| log_rejection("iso8601", e))
}

/// Parse a single stored timestamp such as `2015-05-11 15:30:00+00` into a UTC instant
///
/// # Errors
/// Returns `FormatError` if the text is not a timestamp with a numeric UTC offset
pub fn parse_db_timestamp(text: &str) -> Result<DateTime<Utc>, FormatError> {
    parse_db_boundary(text, text)
}

fn log_rejection(grammar: &'static str, error: FormatError) -> FormatError {
    debug!(
        grammar,
        reason = %error.reason,
        input = %truncate_string(&error.input, MAX_ERROR_INPUT_LEN),
        "rejected period"
    );
    error
}

/// Split `text` on `delimiter` into exactly two parts
fn split_pair<'a>(
    input: &str,
    text: &'a str,
    delimiter: char,
) -> Result<(&'a str, &'a str), FormatError> {
    let parts: Vec<&str> = text.split(delimiter).collect();
    match parts.as_slice() {
        [first, second] => Ok((*first, *second)),
        _ => Err(FormatError::delimiter_count(
            input,
            delimiter,
            2,
            parts.len(),
        )),
    }
}

fn unquote<'a>(input: &str, token: &'a str) -> Result<&'a str, FormatError> {
    token
        .strip_prefix(DB_QUOTE)
        .and_then(|t| t.strip_suffix(DB_QUOTE))
        .ok_or_else(|| FormatError::structure(input, format!("boundary {token} is not quoted")))
}

fn parse_db_boundary(input: &str, token: &str) -> Result<DateTime<Utc>, FormatError> {
    // The offset sign is the first '+' or '-' after the seconds field; the date
    // part before it contains '-' separators of its own.
    let sign_pos = token
        .get(DB_BODY_MIN_LEN..)
        .and_then(|tail| tail.find(|c: char| c == '+' || c == '-'))
        .map(|pos| pos + DB_BODY_MIN_LEN)
        .ok_or_else(|| FormatError::timestamp(input, token, "missing UTC offset"))?;
    let (body, offset) = token.split_at(sign_pos);

    // chrono skips whitespace and accepts single-digit fields; the stored form has neither
    if !has_db_body_shape(body) {
        return Err(FormatError::timestamp(
            input,
            token,
            "expected YYYY-MM-DD HH:MM:SS with an optional fraction",
        ));
    }

    let naive = NaiveDateTime::parse_from_str(body, DB_PARSE_FORMAT)
        .map_err(|e| FormatError::timestamp(input, token, e.to_string()))?;
    let offset = parse_db_offset(offset).ok_or_else(|| {
        FormatError::timestamp(input, token, format!("invalid UTC offset '{offset}'"))
    })?;

    naive
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .filter(in_year_range)
        .ok_or_else(|| FormatError::timestamp(input, token, "timestamp out of range"))
}

/// `YYYY-MM-DD HH:MM:SS`, then nothing or `.` followed by at least one digit
fn has_db_body_shape(body: &str) -> bool {
    if body.len() < DB_BODY_MIN_LEN {
        return false;
    }
    let (fixed, fraction) = body.as_bytes().split_at(DB_BODY_MIN_LEN);
    let fixed_ok = fixed.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b' ',
        13 | 16 => *b == b':',
        _ => b.is_ascii_digit(),
    });
    let fraction_ok = match fraction.split_first() {
        None => true,
        Some((b'.', digits)) => !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
        Some(_) => false,
    };
    fixed_ok && fraction_ok
}

/// Both grammars only carry four-digit years
fn in_year_range(dt: &DateTime<Utc>) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&dt.year())
}

/// Parse `±HH`, `±HHMM` or `±HH:MM`
fn parse_db_offset(offset: &str) -> Option<FixedOffset> {
    if !offset.is_ascii() {
        return None;
    }
    let (sign, digits) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    let (hours, minutes) = match digits.len() {
        2 => (digits, "00"),
        4 => digits.split_at(2),
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_iso_boundary(input: &str, token: &str) -> Result<DateTime<Utc>, FormatError> {
    let instant = DateTime::parse_from_rfc3339(token)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FormatError::timestamp(input, token, e.to_string()))?;
    if in_year_range(&instant) {
        Ok(instant)
    } else {
        Err(FormatError::timestamp(input, token, "timestamp out of range"))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl FromStr for Interval {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso8601(s)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_iso8601(&s).map_err(de::Error::custom)
    }
}
