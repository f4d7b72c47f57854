//! Unified error handling for the activity-stats library.
//!
//! This module provides a consistent error type for all activity-stats
//! operations. Recoverable conditions (empty inputs, missing dates, absent
//! polylines) are expressed as empty results or `None`, never as errors;
//! only genuinely malformed input surfaces here.

use std::fmt;

/// Unified error type for activity-stats operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A polyline string could not be decoded: a delta pair was truncated,
    /// a character fell outside the valid `?`..`~` range, or a varint
    /// overflowed the accumulator. `position` is the byte offset of the
    /// offending (or missing) character.
    MalformedPolyline { position: usize },
    /// The activity-record collection could not be parsed from JSON.
    InvalidRecords { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedPolyline { position } => {
                write!(f, "Malformed polyline at byte {}", position)
            }
            Error::InvalidRecords { message } => {
                write!(f, "Invalid activity records: {}", message)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for activity-stats operations.
pub type Result<T> = std::result::Result<T, Error>;
