//! Authentication trait applied by the HTTP client builder.

use reqwest::header::{HeaderName, HeaderValue};

use crate::error::Error;

/// Trait for producing the credential header attached to every request.
///
/// The returned header value must be marked sensitive so it never shows up
/// in debug output of the underlying client.
pub trait ProviderAuth: Send + Sync {
    /// Build the header (name and value) that authenticates a request.
    fn auth_header(&self) -> Result<(HeaderName, HeaderValue), Error>;
}
