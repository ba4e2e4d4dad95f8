//! API key lookup: an explicit key wins, otherwise the environment.

use log::*;
use secrecy::SecretString;

use crate::error::{api_key_error, ApiKeyErrorKind, Error};

/// Environment variable holding the default Wordcab API key.
pub const API_KEY_ENV_VAR: &str = "WORDCAB_API_KEY";

/// Resolve the API key for a request.
///
/// A non-empty `explicit` key is used as is. Otherwise the key is read from
/// `WORDCAB_API_KEY`, which may also come from a `.env` file.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<SecretString, Error> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(SecretString::new(key.trim().to_string()));
    }

    match dotenvy::var(API_KEY_ENV_VAR) {
        Ok(key) if !key.trim().is_empty() => {
            debug!("Using API key from {}", API_KEY_ENV_VAR);
            Ok(SecretString::new(key.trim().to_string()))
        }
        _ => {
            warn!("No API key provided and {} is not set", API_KEY_ENV_VAR);
            Err(api_key_error(
                ApiKeyErrorKind::NotFound,
                "No API key provided. Pass one explicitly or set WORDCAB_API_KEY.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::env;

    /// Restores the saved variable when dropped.
    struct EnvGuard {
        saved: Option<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard {
                saved: env::var(API_KEY_ENV_VAR).ok(),
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.saved {
                Some(val) => env::set_var(API_KEY_ENV_VAR, val),
                None => env::remove_var(API_KEY_ENV_VAR),
            }
        }
    }

    #[test]
    #[serial]
    fn test_explicit_key_wins_over_environment() {
        let _guard = EnvGuard::new();
        env::set_var(API_KEY_ENV_VAR, "from_env");

        let key = resolve_api_key(Some("explicit")).unwrap();
        assert_eq!(key.expose_secret(), "explicit");
    }

    #[test]
    #[serial]
    fn test_falls_back_to_environment() {
        let _guard = EnvGuard::new();
        env::set_var(API_KEY_ENV_VAR, "from_env");

        let key = resolve_api_key(None).unwrap();
        assert_eq!(key.expose_secret(), "from_env");

        let key = resolve_api_key(Some("  ")).unwrap();
        assert_eq!(key.expose_secret(), "from_env");
    }

    #[test]
    #[serial]
    fn test_missing_key_is_an_error() {
        let _guard = EnvGuard::new();
        env::set_var(API_KEY_ENV_VAR, "");

        let err = resolve_api_key(None).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::ApiKey(ApiKeyErrorKind::NotFound));
    }
}
