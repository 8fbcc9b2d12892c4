//! Configuration constants and validation functions for feed acquisition.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{FeedError, Result};

/// HTTP request timeout in seconds, covering the whole body read.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// HTTP connect timeout in seconds. Never exceeds the request timeout.
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default maximum HTTP response size in bytes (20 MB).
///
/// Feeds are small; anything near this size is almost certainly not a feed.
/// Can be overridden via CLI --max-size flag or `FEEDWALKER_MAX_RESPONSE_SIZE`.
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 20 * 1024 * 1024;

/// Maximum number of attempts for transient download failures.
pub const MAX_RETRIES: u32 = 3;

/// Upper bound accepted for the number of attempts.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Base delay for exponential backoff (milliseconds).
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// Environment variable overriding [`HTTP_TIMEOUT_SECS`].
pub const ENV_HTTP_TIMEOUT: &str = "FEEDWALKER_HTTP_TIMEOUT_SECS";

/// Environment variable overriding [`DEFAULT_MAX_RESPONSE_SIZE`].
pub const ENV_MAX_RESPONSE_SIZE: &str = "FEEDWALKER_MAX_RESPONSE_SIZE";

/// Environment variable overriding [`MAX_RETRIES`].
pub const ENV_MAX_RETRIES: &str = "FEEDWALKER_MAX_RETRIES";

/// Feed URL pattern: http or https scheme followed by a host.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FEED_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid regex"));

/// Validate a feed URL.
///
/// # Examples
/// ```
/// use feedwalker::config::validate_feed_url;
///
/// assert!(validate_feed_url("https://stackoverflow.com/feeds/tag?tagnames=rust").is_ok());
/// assert!(validate_feed_url("ftp://example.com/feed.xml").is_err());
/// ```
pub fn validate_feed_url(url: &str) -> Result<()> {
    if FEED_URL_PATTERN.is_match(url) {
        Ok(())
    } else {
        Err(FeedError::InvalidUrl(url.to_string()))
    }
}

/// Whether a source argument names a remote feed rather than a local file.
#[must_use]
pub fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Settings for downloading feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_response_size: u64,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl FetchConfig {
    /// Load settings from the environment, falling back to the defaults.
    ///
    /// # Errors
    /// [`FeedError::Config`] when a variable is set but not a valid number.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_number(ENV_HTTP_TIMEOUT)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(size) = env_number(ENV_MAX_RESPONSE_SIZE)? {
            config.max_response_size = size;
        }
        if let Some(retries) = env_number(ENV_MAX_RETRIES)? {
            config.max_retries = u32::try_from(retries)
                .map_err(|_| FeedError::Config(format!("{ENV_MAX_RETRIES} is too large")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the maximum response size.
    #[must_use]
    pub fn with_max_response_size(mut self, max_response_size: u64) -> Self {
        self.max_response_size = max_response_size;
        self
    }

    /// Override the number of attempts.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the base delay of the retry backoff.
    #[must_use]
    pub fn with_retry_base_delay(mut self, retry_base_delay: Duration) -> Self {
        self.retry_base_delay = retry_base_delay;
        self
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    /// [`FeedError::Config`] for a zero size limit, or for a number of
    /// attempts that is zero or above [`MAX_RETRIES_LIMIT`].
    pub fn validate(&self) -> Result<()> {
        if self.max_response_size == 0 {
            return Err(FeedError::Config(
                "maximum response size must be greater than zero".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(FeedError::Config(
                "at least one download attempt is required".to_string(),
            ));
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(FeedError::Config(format!(
                "at most {MAX_RETRIES_LIMIT} download attempts are allowed, got {}",
                self.max_retries
            )));
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            max_retries: MAX_RETRIES,
            retry_base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        }
    }
}

fn env_number(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => parse_number(name, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| FeedError::Config(format!("{name} must be a whole number, got '{value}'")))
}
