//! Retry with exponential backoff.
//!
//! Rate limits (429), gateway/server errors (500, 502, 503, 504) and network
//! failures are retried. Client errors such as 400 or 401 fail immediately.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff settings for enhancement requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt. 0 disables retrying.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Shorten each delay by a fixed per-attempt factor.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay.as_secs_f64());
        if !self.jitter {
            return Duration::from_secs_f64(capped);
        }
        // Fixed per-attempt spread.
        const FACTORS: [f64; 4] = [0.75, 0.90, 0.60, 0.85];
        let factor = FACTORS[(attempt % 4) as usize];
        Duration::from_secs_f64(capped * factor)
    }

    /// Whether a failure on retry number `attempt` should be tried again.
    pub fn should_retry(&self, attempt: u32, error: &str) -> bool {
        attempt < self.max_retries && is_transient_error(error) && !is_permanent_error(error)
    }

    /// Run `call` until it succeeds, fails permanently, or retries run out.
    pub async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, String>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, String>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(v) => return Ok(v),
                Err(e) if self.should_retry(attempt, &e) => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        "Transient API error (attempt {}/{}): {e}. Retrying in {delay:?}...",
                        attempt + 1,
                        self.max_retries,
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whether an error string describes a retryable failure.
pub fn is_transient_error(error: &str) -> bool {
    if ["429", "500", "502", "503", "504"]
        .iter()
        .any(|s| error.contains(&format!("HTTP {s}")))
    {
        return true;
    }
    let lower = error.to_lowercase();
    [
        "request failed:",
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "broken pipe",
    ]
    .iter()
    .any(|p| lower.contains(p))
}

/// Whether an error string describes a failure retrying cannot fix.
pub fn is_permanent_error(error: &str) -> bool {
    ["HTTP 400", "HTTP 401", "HTTP 403", "HTTP 404", "HTTP 422"]
        .iter()
        .any(|p| error.contains(p))
}
