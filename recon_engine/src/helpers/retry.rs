//! Bounded retries for fallible asynchronous operations.
//!
//! [`retry_with_policy`] runs an operation until it succeeds, fails with an error that the caller's `is_retryable`
//! predicate rejects, or the policy's attempt ceiling is reached. Every attempt can be bounded by a timeout; an
//! attempt that times out counts as a retryable failure.
use std::{fmt::Display, future::Future, time::Duration};

use log::*;
use tokio::time::{sleep, timeout};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the wait between attempts grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Always wait `base_delay`.
    Fixed,
    /// Wait `base_delay × n` after the n-th failure.
    Linear,
    /// Wait `base_delay × multiplier^(n-1)` after the n-th failure.
    Exponential { multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound for any single wait.
    pub max_delay: Duration,
    pub backoff: Backoff,
    /// Upper bound for a single attempt. `None` lets an attempt run as long as it likes.
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff: Backoff::Linear,
            attempt_timeout: Some(DEFAULT_ATTEMPT_TIMEOUT),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, backoff: Backoff) -> Self {
        Self { max_attempts, base_delay, backoff, ..Default::default() }
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Option<Duration>) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// The wait after the `failed_attempts`-th consecutive failure (1-based).
    pub fn delay_for_attempt(&self, failed_attempts: u32) -> Duration {
        let n = failed_attempts.max(1);
        let delay = match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Linear => self.base_delay.saturating_mul(n),
            Backoff::Exponential { multiplier } => {
                #[allow(clippy::cast_possible_wrap)]
                let factor = multiplier.max(1.0).powi((n - 1) as i32);
                let millis = self.base_delay.as_millis() as f64 * factor;
                if millis.is_finite() && millis < self.max_delay.as_millis() as f64 {
                    Duration::from_millis(millis as u64)
                } else {
                    self.max_delay
                }
            },
        };
        delay.min(self.max_delay)
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Why a single attempt failed.
#[derive(Debug)]
pub enum AttemptError<E> {
    Failed(E),
    TimedOut(Duration),
}

impl<E: Display> Display for AttemptError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "{e}"),
            Self::TimedOut(t) => write!(f, "Operation timed out after {}ms", t.as_millis()),
        }
    }
}

/// The final outcome of an operation that never succeeded.
#[derive(Debug)]
pub struct RetryError<E> {
    /// The number of attempts made.
    pub attempts: u32,
    /// False if the retries stopped because the last error was not retryable, rather than because they ran out.
    pub retryable: bool,
    pub last: AttemptError<E>,
}

impl<E: Display> Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed after {} attempt(s). {}", self.attempts, self.last)
    }
}

impl<E: std::fmt::Debug + Display> std::error::Error for RetryError<E> {}

/// Runs `operation` under the given retry policy.
///
/// Errors for which `is_retryable` returns false are returned immediately. Timed-out attempts are always retried.
/// There is no wait after the final attempt.
pub async fn retry_with_policy<F, Fut, T, E>(
    policy: &RetryPolicy,
    operation_name: &str,
    is_retryable: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        let result = match policy.attempt_timeout {
            Some(limit) => match timeout(limit, operation()).await {
                Ok(res) => res.map_err(AttemptError::Failed),
                Err(_) => Err(AttemptError::TimedOut(limit)),
            },
            None => operation().await.map_err(AttemptError::Failed),
        };
        let err = match result {
            Ok(value) => {
                if attempt > 1 {
                    info!("🔁️ {operation_name} succeeded on attempt {attempt}");
                }
                return Ok(value);
            },
            Err(e) => e,
        };
        let retryable = match &err {
            AttemptError::Failed(e) => is_retryable(e),
            AttemptError::TimedOut(_) => true,
        };
        if !retryable {
            warn!("🔁️ {operation_name} failed on attempt {attempt} with a permanent error. {err}");
            return Err(RetryError { attempts: attempt, retryable: false, last: err });
        }
        if attempt >= max_attempts {
            warn!("🔁️ {operation_name} failed on attempt {attempt} of {max_attempts}. Giving up. {err}");
            return Err(RetryError { attempts: attempt, retryable: true, last: err });
        }
        let delay = policy.delay_for_attempt(attempt);
        warn!(
            "🔁️ {operation_name} failed on attempt {attempt} of {max_attempts}. Retrying in {}ms. {err}",
            delay.as_millis()
        );
        sleep(delay).await;
        attempt += 1;
    }
}
