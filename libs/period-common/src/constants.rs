//! Grammar constants shared by the period codec

/// Separator between the two boundaries of an ISO-8601 interval
pub const ISO_INTERVAL_SEPARATOR: char = '/';

/// Separator between the two quoted boundaries of a range literal
pub const DB_BOUNDARY_SEPARATOR: char = ',';

/// Opening bracket of a closed range literal
pub const DB_RANGE_OPEN: char = '[';

/// Closing bracket of a closed range literal
pub const DB_RANGE_CLOSE: char = ']';

/// Quote wrapped around each range boundary
pub const DB_QUOTE: char = '"';

/// Format used when writing a range boundary (no sub-second part)
pub const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used when reading a range boundary body (optional fraction)
pub const DB_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Offset suffix written after every stored boundary
pub const DB_UTC_SUFFIX: &str = "+00";

/// Length of the `YYYY-MM-DD HH:MM:SS` part of a stored boundary
pub const DB_BODY_MIN_LEN: usize = 19;

/// Longest slice of offending input echoed back in error messages
pub const MAX_ERROR_INPUT_LEN: usize = 120;

/// Earliest year both grammars can express (four-digit years only)
pub const MIN_YEAR: i32 = 0;

/// Latest year both grammars can express
pub const MAX_YEAR: i32 = 9999;
