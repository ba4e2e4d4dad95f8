use clap::builder::TypedValueParser as _;
use clap::Parser;
use log::LevelFilter;

/// Default Wordcab API base URL used when `WORDCAB_API_URL` is not set.
pub const DEFAULT_WORDCAB_API_URL: &str = "https://wordcab.com/api/v1";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Parser)]
pub struct Config {
    /// The API key to use when calling the Wordcab API.
    #[arg(long, env = "WORDCAB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// The base URL of the Wordcab API.
    /// Override in tests to point at a mock server.
    #[arg(long, env = "WORDCAB_API_URL", default_value = DEFAULT_WORDCAB_API_URL)]
    base_url: String,

    /// Timeout in seconds for a single request to the Wordcab API
    #[arg(long, env, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Number of times a failed transport call is retried. Zero disables retries.
    #[arg(long, env, default_value_t = 0)]
    pub max_retries: u32,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Config {
    /// Returns the Wordcab API key, if configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the Wordcab API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
