//! Retry policy and delay abstraction
//!
//! The completion endpoint is treated as unreliable: every attempt that
//! fails (transport error, non-2xx status, malformed body) consumes one
//! slot of a fixed attempt budget, with exponential backoff plus jitter
//! between attempts. Delays go through the [`Sleeper`] trait so tests can
//! observe the computed delays without waiting out real wall-clock time.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Default attempt budget (first try plus four retries)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default base delay before the first retry
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
/// Default jitter ceiling added to every delay
pub const DEFAULT_JITTER: Duration = Duration::from_millis(500);

/// Exponential backoff schedule for completion attempts
///
/// The delay after failed attempt `n` (1-based) is
/// `base_delay * 2^(n-1) + uniform(0, jitter)`.
///
/// # Examples
///
/// ```
/// use meditrack::providers::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// let delay = policy.delay_for(3);
/// assert!(delay >= Duration::from_millis(4000));
/// assert!(delay < Duration::from_millis(4500));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random jitter added to each delay
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit parameters
    pub fn new(max_attempts: u32, base_delay: Duration, jitter: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            jitter,
        }
    }

    /// Compute the delay to wait after failed attempt `attempt` (1-based)
    ///
    /// The exponential component is deterministic; the jitter component is
    /// drawn uniformly from `[0, jitter)` to de-synchronize retries from
    /// other clients hammering the same upstream.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let backoff = self.base_delay * 2u32.saturating_pow(exponent);
        backoff + self.sample_jitter()
    }

    fn sample_jitter(&self) -> Duration {
        let ceiling = self.jitter.as_millis() as u64;
        if ceiling == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..ceiling))
    }

    /// Returns true if another attempt remains after `attempt` attempts
    pub fn has_attempts_remaining(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Asynchronous delay abstraction
///
/// Production code sleeps on the tokio timer; tests substitute an
/// implementation that records the requested delays and returns
/// immediately, keeping attempt sequencing testable without wall-clock
/// waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
