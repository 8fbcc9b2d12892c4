//! HTTP client wrapper for downloading feeds.

use std::io::{self, Read};
use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::config::{validate_feed_url, FetchConfig};
use crate::error::{FeedError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("feedwalker/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with the timeouts from `config`
/// and the feedwalker user agent.
pub fn create_client(config: &FetchConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout.min(config.timeout))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Open a feed URL with retry logic and return its body as a stream.
///
/// Uses exponential backoff for transient failures (connection errors,
/// timeouts, 5xx responses). Client errors (4xx) fail immediately. A response
/// that declares a length above the configured limit is rejected before its
/// body is read, and the returned body fails with an I/O error once it
/// yields more than the limit.
pub fn fetch_feed(
    client: &Client,
    url: &str,
    config: &FetchConfig,
) -> Result<LimitedBody<Response>> {
    validate_feed_url(url)?;
    let mut last_error: Option<String> = None;

    for attempt in 0..config.max_retries {
        if attempt > 0 {
            let delay = backoff_delay(config.retry_base_delay, attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
            thread::sleep(delay);
        }

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();

                // Retry on server errors (5xx)
                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = config.max_retries,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("Server error: {status}"));
                    continue;
                }

                // Don't retry client errors (4xx) - they won't succeed
                let response = response.error_for_status().map_err(|source| {
                    FeedError::Download {
                        url: url.to_string(),
                        source,
                    }
                })?;

                if let Some(size) = response.content_length() {
                    if size > config.max_response_size {
                        return Err(FeedError::ResponseTooLarge {
                            url: url.to_string(),
                            size,
                            limit: config.max_response_size,
                        });
                    }
                }

                tracing::debug!(url, status = %status, "Feed response received");
                return Ok(LimitedBody::new(response, config.max_response_size));
            }
            Err(e) => {
                // Retry on connection/timeout errors
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = config.max_retries,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                // Other errors (like invalid URL) - don't retry
                return Err(FeedError::Download {
                    url: url.to_string(),
                    source: e,
                });
            }
        }
    }

    // All retries exhausted
    Err(FeedError::RetriesExhausted {
        attempts: config.max_retries,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

/// Exponential backoff: base, 2x base, 4x base, ... saturating on overflow.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

/// Reader that fails once the wrapped body exceeds a byte limit.
#[derive(Debug)]
pub struct LimitedBody<R> {
    inner: R,
    remaining: u64,
    limit: u64,
}

impl<R: Read> LimitedBody<R> {
    /// Wrap `inner`, allowing at most `limit` bytes through.
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
            limit,
        }
    }
}

impl<R: Read> Read for LimitedBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            let mut probe = [0u8; 1];
            return match self.inner.read(&mut probe)? {
                0 => Ok(0),
                _ => Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("response body exceeds {} bytes", self.limit),
                )),
            };
        }

        let max = usize::try_from(self.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let read = self.inner.read(&mut buf[..max])?;
        self.remaining -= read as u64;
        Ok(read)
    }
}
