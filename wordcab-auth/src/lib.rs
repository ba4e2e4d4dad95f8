//! # wordcab-auth
//!
//! Authentication and transport plumbing for the Wordcab API client:
//! - API key resolution (explicit key, else `WORDCAB_API_KEY` from the environment)
//! - Bearer token authentication applied to every request
//! - HTTP client building with middleware
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wordcab_auth::{
//!     api_key::BearerTokenAuth,
//!     credentials::resolve_api_key,
//!     http::AuthenticatedClientBuilder,
//! };
//!
//! let api_key = resolve_api_key(None)?;
//! let client = AuthenticatedClientBuilder::new()
//!     .with_auth(Box::new(BearerTokenAuth::new(api_key)))
//!     .build()?;
//! ```

pub mod api_key;
pub mod credentials;
pub mod error;
pub mod http;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
