//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;
use wordcab_auth::error::{
    ApiKeyErrorKind, Error as AuthError, ErrorKind as AuthErrorKind, HttpErrorKind,
};
use wordcab_types::Error as TypesError;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree with `domain::error::Error`
/// as the root holding an `error_kind` that says where the failure happened:
/// inside this client (`Internal`, e.g. a rejected parameter or a missing key)
/// or on the other side of the wire (`External`). The `source` field keeps the
/// original error, so transport failures reach the caller unmodified.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// Missing or unusable client configuration, such as the API key.
    Config,
    /// A request parameter outside the values the API accepts.
    Validation(String),
    /// A source object that cannot be built or loaded.
    Source(String),
    /// A domain object that violates its invariants.
    Object(String),
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Unauthorized,
    NotFound,
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            other => Error {
                source: Some(Box::new(other)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            },
        }
    }
}

// This is where we translate errors from the `wordcab-auth` layer to the `domain` layer.
impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        let error_kind = match &err.error_kind {
            AuthErrorKind::ApiKey(ApiKeyErrorKind::NotFound)
            | AuthErrorKind::ApiKey(ApiKeyErrorKind::InvalidFormat) => {
                DomainErrorKind::Internal(InternalErrorKind::Config)
            }
            AuthErrorKind::Http(HttpErrorKind::BuilderFailed) => DomainErrorKind::Internal(
                InternalErrorKind::Other("Failed to build HTTP client".to_string()),
            ),
            AuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<TypesError> for Error {
    fn from(err: TypesError) -> Self {
        Error {
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Object(err.to_string())),
            source: Some(Box::new(err)),
        }
    }
}

/// Helper function to create parameter validation errors.
pub fn validation_error(message: impl Into<String>) -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(message.into())),
    }
}

/// Helper function to create source object errors.
pub fn source_error(message: impl Into<String>) -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Source(message.into())),
    }
}

/// Maps a non-success HTTP status and its body to an external error.
pub fn status_error(status: reqwest::StatusCode, body: String) -> Error {
    let kind = match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            ExternalErrorKind::Unauthorized
        }
        reqwest::StatusCode::NOT_FOUND => ExternalErrorKind::NotFound,
        _ => ExternalErrorKind::Other(format!("{}: {}", status.as_u16(), body)),
    };
    Error {
        source: Some(body.into()),
        error_kind: DomainErrorKind::External(kind),
    }
}
