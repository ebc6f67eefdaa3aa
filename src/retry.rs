// Retry policy for the HTTP transport: exponential backoff capped at a maximum delay

use std::time::Duration;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            backoff_factor: 2.0,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.initial_delay.is_zero() {
            return Err(ClientError::Config(
                "initial retry delay must be > 0".to_string(),
            ));
        }
        if self.max_delay < self.initial_delay {
            return Err(ClientError::Config(
                "max retry delay must be >= initial delay".to_string(),
            ));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(ClientError::Config(
                "backoff factor must be >= 1.0".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of attempts a single call may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait before retry number `attempt` (1-based):
    /// `min(initial_delay * backoff_factor^(attempt-1), max_delay)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 1).min(i32::MAX as u32) as i32;
        let delay_secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);

        // Unvalidated policies (negative or NaN factor) fall back to the cap
        if !delay_secs.is_finite()
            || delay_secs < 0.0
            || delay_secs >= self.max_delay.as_secs_f64()
        {
            return self.max_delay;
        }
        Duration::from_secs_f64(delay_secs)
    }
}

/// 5xx and 429 responses are transient and may be retried.
pub fn is_retryable_status(status: u16) -> bool {
    status >= 500 || status == 429
}
