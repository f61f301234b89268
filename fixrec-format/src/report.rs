use std::fmt;

use serde::Serialize;

use crate::parse::UnpackError;
use crate::record::Record;

/// Discriminant of a [`RecordError`], used for policy decisions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    Unpack,
    Validation,
    Incomplete,
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unpack => write!(f, "unpack"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Incomplete => write!(f, "incomplete"),
            ErrorKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// A failure attributed to a single record.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    /// The record's bytes do not match the layout.
    #[error("cannot unpack record: got {received} bytes, layout requires exactly {expected}")]
    Unpack { expected: usize, received: usize },

    /// One or more rule violations.
    #[error("validation failed: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    /// Trailing bytes shorter than one record.
    #[error("incomplete record: got {received} of {expected} bytes")]
    Incomplete { expected: usize, received: usize },

    /// Catch-all for failures outside the taxonomy; treated like an unpack
    /// failure for policy purposes.
    #[error("unexpected failure: {message}")]
    Unexpected { message: String },
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::Unpack { .. } => ErrorKind::Unpack,
            RecordError::Validation { .. } => ErrorKind::Validation,
            RecordError::Incomplete { .. } => ErrorKind::Incomplete,
            RecordError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

impl From<UnpackError> for RecordError {
    fn from(e: UnpackError) -> Self {
        RecordError::Unpack {
            expected: e.expected,
            received: e.received,
        }
    }
}

/// One failure, tagged with the position of the record that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub record_number: u64,
    pub byte_offset: u64,
    pub error: RecordError,
}

/// Terminal snapshot of one read: accepted records, counts, and logs.
///
/// Returned by value from every read call; the reader keeps no state
/// between calls.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResult {
    /// Accepted records, in file order.
    pub records: Vec<Record>,
    /// Records scanned, whether or not they were accepted.
    pub total_records: u64,
    pub valid_records: u64,
    pub invalid_records: u64,
    pub errors: Vec<ErrorEntry>,
    pub warnings: Vec<String>,
    pub file_size: u64,
    /// Whole records the file size can hold.
    pub expected_records: u64,
}

impl ReadResult {
    /// Percentage of scanned records that were accepted; 0 when nothing was
    /// scanned.
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            self.valid_records as f64 / self.total_records as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(total: u64, valid: u64) -> ReadResult {
        ReadResult {
            records: Vec::new(),
            total_records: total,
            valid_records: valid,
            invalid_records: total - valid,
            errors: Vec::new(),
            warnings: Vec::new(),
            file_size: 0,
            expected_records: 0,
        }
    }

    #[test]
    fn success_rate_is_zero_without_records() {
        assert_eq!(result(0, 0).success_rate(), 0.0);
    }

    #[test]
    fn success_rate_is_a_percentage() {
        assert_eq!(result(4, 3).success_rate(), 75.0);
        assert_eq!(result(3, 3).success_rate(), 100.0);
    }

    #[test]
    fn record_error_kinds_round_trip() {
        let errors = [
            RecordError::Unpack {
                expected: 22,
                received: 10,
            },
            RecordError::Validation {
                violations: vec!["id -5 below minimum (1)".into()],
            },
            RecordError::Incomplete {
                expected: 22,
                received: 10,
            },
            RecordError::Unexpected {
                message: "boom".into(),
            },
        ];
        let kinds: Vec<ErrorKind> = errors.iter().map(RecordError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::Unpack,
                ErrorKind::Validation,
                ErrorKind::Incomplete,
                ErrorKind::Unexpected
            ]
        );
    }
}
