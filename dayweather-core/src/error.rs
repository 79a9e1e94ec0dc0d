//! Typed errors for the processing layer.

use thiserror::Error;

/// Raised when an API payload breaks the shape the processors rely on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("weather entry at {dt} has no description")]
    NoDescription { dt: i64 },

    #[error("timestamp {0} is outside the representable date range")]
    TimestampOutOfRange(i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Unknown locale '{0}'. Use a tag such as ko-KR, en-US or de_DE.")]
    Unknown(String),
}
