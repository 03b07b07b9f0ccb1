//! HTTP utilities for Azure Resource Manager REST calls
//!
//! Wraps a single outbound GET with exponential-backoff retry for
//! rate-limited (429) responses. Transport-level failures and other
//! non-success statuses surface immediately without retry.

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Request timeout for individual ARM calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call fetch failure. Recovered into a result slot by the worker
/// pool; never aborts a batch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (connection refused, timeout). Not retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 429 responses persisted past the retry budget.
    #[error("rate limited after {attempts} retries: {body}")]
    RateLimitExhausted { attempts: u32, body: String },

    /// Any non-200, non-429 response.
    #[error("API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body was not the JSON we expected.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A worker task died before producing a result.
    #[error("worker task failed: {0}")]
    Worker(String),
}

/// Retry behavior for rate-limited calls.
///
/// The defaults (5 retries, 1 s base, doubling per attempt, up to 1 s of
/// jitter) match observed ARM throttling behavior but are not load-bearing;
/// tests shrink the base to keep runtimes sane.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff for the given attempt: base × 2^attempt plus 0–1 unit of
    /// random jitter so concurrent workers don't resynchronize.
    fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.saturating_mul(1u32 << attempt.min(16));
        let jitter = self.base_delay.mul_f64(rand::rng().random_range(0.0..1.0));
        exponential + jitter
    }
}

/// Sanitize response body for logging and error display.
/// Truncates long responses and strips non-printable characters.
fn sanitize_body(body: &str) -> String {
    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();

    if cleaned.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &cleaned[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        cleaned
    }
}

/// HTTP client wrapper for ARM API calls with 429-aware retry.
#[derive(Clone)]
pub struct AzureHttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl AzureHttpClient {
    /// Create a new HTTP client with the given retry policy.
    pub fn new(retry: RetryPolicy) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("azinv/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, retry })
    }

    /// Make a GET request to an ARM endpoint, retrying on 429.
    ///
    /// The retry loop is deliberately a bounded loop with an attempt
    /// counter; the backoff sleeps happen on the calling task, so a worker
    /// holding an admission permit keeps holding it while throttled.
    pub async fn get(&self, url: &str, token: &str) -> Result<Value, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            tracing::debug!("GET {} (attempt {})", url, attempt + 1);

            let response = self
                .client
                .get(url)
                .bearer_auth(token)
                .header("Content-Type", "application/json")
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= self.retry.max_retries {
                    tracing::error!(
                        "rate limit retries exhausted after {} attempts: {}",
                        attempt,
                        sanitize_body(&body)
                    );
                    return Err(FetchError::RateLimitExhausted {
                        attempts: attempt,
                        body: sanitize_body(&body),
                    });
                }

                let delay = self.retry.backoff(attempt);
                tracing::warn!(
                    "rate limited (429), retrying in {:?} (attempt {}/{})",
                    delay,
                    attempt + 1,
                    self.retry.max_retries
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                tracing::error!("API error: {} - {}", status, sanitize_body(&body));
                return Err(FetchError::Status {
                    status,
                    body: sanitize_body(&body),
                });
            }

            return Ok(serde_json::from_str(&body)?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_body(&body);
        assert!(sanitized.contains("truncated"));
        assert!(sanitized.contains("500 bytes"));
    }

    #[test]
    fn sanitize_strips_control_characters() {
        let sanitized = sanitize_body("ok\x00\x07\nrest");
        assert_eq!(sanitized, "okrest");
    }

    #[test]
    fn backoff_grows_exponentially() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
        };
        // Jitter adds at most one base unit on top of the exponential part.
        for attempt in 0..5 {
            let d = policy.backoff(attempt);
            let floor = Duration::from_millis(100 * (1 << attempt));
            assert!(d >= floor, "attempt {attempt}: {d:?} < {floor:?}");
            assert!(d < floor + Duration::from_millis(100));
        }
    }
}
