//! Error types for Wordcab domain objects.

use std::fmt;

/// Construction errors for domain objects.
///
/// Both variants are fatal for the object being built: the value is rejected
/// and nothing is partially constructed.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A field holds a value that breaks the object's invariant
    /// (e.g. an utterance whose end index precedes its start index).
    InvalidValue(String),

    /// A payload could not be read into the expected type, including fields
    /// of the wrong type such as a numeric speaker label.
    Deserialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Deserialization(err.to_string())
    }
}
