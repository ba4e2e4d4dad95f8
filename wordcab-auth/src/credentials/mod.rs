//! Resolution of the API key used to open a session.

mod env;

pub use env::{resolve_api_key, API_KEY_ENV_VAR};
