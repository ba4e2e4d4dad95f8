//! API key authentication for the Wordcab API.
//!
//! Wordcab expects the account key as a standard bearer token.

mod auth;
mod bearer;

pub use auth::ProviderAuth;
pub use bearer::BearerTokenAuth;
