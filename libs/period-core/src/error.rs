//! Error types for the period codec

use period_common::{truncate_string, MAX_ERROR_INPUT_LEN};
use std::fmt;
use thiserror::Error;

/// Result type alias for period operations
pub type Result<T> = std::result::Result<T, PeriodError>;

/// Why an interval string was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorReason {
    /// Splitting on the delimiter produced the wrong number of parts
    DelimiterCount {
        delimiter: char,
        expected: usize,
        found: usize,
    },
    /// Brackets or quotes are missing or misplaced
    Structure { message: String },
    /// A boundary token could not be parsed as a timestamp
    Timestamp { token: String, message: String },
}

impl fmt::Display for FormatErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DelimiterCount {
                delimiter,
                expected,
                found,
            } => write!(
                f,
                "expected {expected} parts separated by '{delimiter}', found {found}"
            ),
            Self::Structure { message } => write!(f, "{message}"),
            Self::Timestamp { token, message } => {
                write!(f, "invalid timestamp '{token}': {message}")
            }
        }
    }
}

/// Malformed interval input, in either grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid period '{}': {reason}", truncate_string(.input, MAX_ERROR_INPUT_LEN))]
pub struct FormatError {
    /// The full offending input
    pub input: String,
    pub reason: FormatErrorReason,
}

impl FormatError {
    pub(crate) fn delimiter_count(
        input: &str,
        delimiter: char,
        expected: usize,
        found: usize,
    ) -> Self {
        Self {
            input: input.to_string(),
            reason: FormatErrorReason::DelimiterCount {
                delimiter,
                expected,
                found,
            },
        }
    }

    pub(crate) fn structure(input: &str, message: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: FormatErrorReason::Structure {
                message: message.into(),
            },
        }
    }

    pub(crate) fn timestamp(input: &str, token: &str, message: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: FormatErrorReason::Timestamp {
                token: token.to_string(),
                message: message.into(),
            },
        }
    }
}

/// Main error type for period operations
#[derive(Error, Debug)]
pub enum PeriodError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Column '{column}' holds the wrong kind of value, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("No column mappings for entity: {entity}")]
    UnknownEntity { entity: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PeriodError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a column type error
    pub fn column_type(column: impl Into<String>, expected: &'static str) -> Self {
        Self::ColumnType {
            column: column.into(),
            expected,
        }
    }

    /// Whether the error was caused by client-supplied data
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Serialization(_))
    }

    /// HTTP status a request handler should answer with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_delimiter_count_message() {
        let error = FormatError::delimiter_count("a/b/c", '/', 2, 3);
        let message = error.to_string();
        assert!(message.contains("a/b/c"));
        assert!(message.contains("expected 2 parts separated by '/', found 3"));
    }

    #[test]
    fn test_structure_message() {
        let error = FormatError::structure("\"x\"]", "missing opening '['");
        assert_eq!(
            error.to_string(),
            "Invalid period '\"x\"]': missing opening '['"
        );
    }

    #[test]
    fn test_timestamp_message() {
        let error = FormatError::timestamp("x/y", "x", "premature end of input");
        assert!(error.to_string().contains("invalid timestamp 'x'"));
        assert!(matches!(
            error.reason,
            FormatErrorReason::Timestamp { ref token, .. } if token == "x"
        ));
    }

    #[test]
    fn test_long_input_is_truncated_in_message_only() {
        let input = "9".repeat(500);
        let error = FormatError::structure(&input, "missing opening '['");
        assert_eq!(error.input.len(), 500);
        assert!(error.to_string().len() < 200);
        assert!(error.to_string().contains("..."));
    }

    #[test]
    fn test_format_error_is_client_error() {
        let error: PeriodError = FormatError::structure("", "empty").into();
        assert!(error.is_client_error());
        assert_eq!(error.status_code(), 400);
        // Transparent: message is the FormatError's own
        assert!(error.to_string().starts_with("Invalid period"));
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: PeriodError = json_error.into();
        assert!(matches!(error, PeriodError::Serialization(_)));
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_io_error_from_std() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: PeriodError = io_error.into();
        assert!(matches!(error, PeriodError::Io(_)));
        assert!(!error.is_client_error());
        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn test_column_type_helper() {
        let error = PeriodError::column_type("observation_phenomenontime", "text");
        assert!(error.to_string().contains("observation_phenomenontime"));
        assert!(error.to_string().contains("expected text"));
        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn test_configuration_helper() {
        let error = PeriodError::configuration("Missing alias");
        match error {
            PeriodError::Configuration { message } => assert_eq!(message, "Missing alias"),
            _ => panic!("Expected Configuration error"),
        }
    }
}
