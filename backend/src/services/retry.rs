//! Retry with exponential backoff for transient source failures.

use log::warn;
use std::future::Future;
use std::time::Duration;

use crate::config::RetrySettings;
use crate::error::{PortalError, PortalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            retry_delay_ms: settings.retry_delay_ms,
            backoff_factor: settings.backoff_factor.max(1),
        }
    }
}

impl RetryPolicy {
    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            retry_delay_ms: 0,
            backoff_factor: 1,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.backoff_factor.max(1));
        let multiplier = factor.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.retry_delay_ms.saturating_mul(multiplier))
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up. The last error is returned unchanged.
pub async fn retry_async<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> PortalResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PortalResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.delay_for(attempt);
                warn!(
                    "{} failed (attempt {}/{}), retrying in {:?}: {}",
                    operation,
                    attempt,
                    policy.max_retries + 1,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(with_operation_if_missing(e, operation)),
        }
    }
}

fn with_operation_if_missing(error: PortalError, operation: &str) -> PortalError {
    if error.context().operation.is_some() {
        error
    } else {
        error.with_operation(operation)
    }
}
