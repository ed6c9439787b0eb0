//! Bounded retry with backoff for operations that fail transiently.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::utils::logging;

pub struct RetryHandler {
    max_attempts: u32,
    base_delay_ms: u64,
}

impl RetryHandler {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: 1_000,
        }
    }

    /// Run `operation` until it succeeds or the attempt budget is spent;
    /// delays double between attempts
    pub async fn execute_with_retry<T, E, F, Fut>(
        &self,
        operation: F,
        description: &str,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut delay_ms = self.base_delay_ms;
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts => {
                    logging::log_warning(&format!(
                        "{} failed (attempt {}/{}): {}, retrying in {}ms",
                        description, attempt, self.max_attempts, error, delay_ms
                    ));
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms *= 2;
                    attempt += 1;
                }
                Err(error) => {
                    logging::log_error(&format!(
                        "{} failed after {} attempts: {}",
                        description, self.max_attempts, error
                    ));
                    return Err(error);
                }
            }
        }
    }
}
