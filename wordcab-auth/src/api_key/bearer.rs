//! Standard Bearer token authentication.

use log::*;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use super::ProviderAuth;
use crate::error::{api_key_error, ApiKeyErrorKind, Error};

/// Standard Bearer token authentication.
///
/// Uses the standard `Authorization: Bearer <token>` header pattern.
pub struct BearerTokenAuth {
    token: SecretString,
}

impl BearerTokenAuth {
    /// Create a new Bearer token authenticator.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Get a reference to the token.
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl ProviderAuth for BearerTokenAuth {
    fn auth_header(&self) -> Result<(HeaderName, HeaderValue), Error> {
        let auth_value = format!("Bearer {}", self.token.expose_secret());
        let mut header_value = HeaderValue::from_str(&auth_value).map_err(|e| {
            warn!("Failed to create auth header: {:?}", e);
            api_key_error(ApiKeyErrorKind::InvalidFormat, "Invalid API key format")
        })?;
        header_value.set_sensitive(true);

        Ok((AUTHORIZATION, header_value))
    }
}
